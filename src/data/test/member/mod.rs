use crate::{
    data::member::{CommunityMemberRepository, NewMember},
    model::member::{CommunityRole, MembershipState},
};
use chrono::Utc;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_assigned_by;
mod get_member_stats;
mod get_members;
mod has_shared_staff;
mod save;
