use crate::data::user::UserRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod get_by_id;
