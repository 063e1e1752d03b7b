use crate::{
    data::community::CommunityRepository,
    model::community::{
        CommunitySearchParams, CreateCommunityParams, PrivacyLevel, UpdateCommunityParams,
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete;
mod get_user_communities;
mod search;
mod set_owner;
mod update;
mod update_counts;
