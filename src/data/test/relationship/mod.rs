use crate::data::relationship::CommunityRelationshipRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod edges_from;
mod link;
mod unlink;
