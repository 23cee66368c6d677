pub mod clvdash_env;
pub mod mock_service;
