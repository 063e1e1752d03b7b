use std::sync::Mutex;

use crate::{
    config::EngineConfig,
    data::{member::CommunityMemberRepository, relationship::CommunityRelationshipRepository},
    error::{business::BusinessRuleError, AppError, ErrorKind},
    model::{
        community::{CommunitySearchParams, CreateCommunityParams, PrivacyLevel},
        member::{CommunityRole, MembershipState},
    },
    service::{
        community::CommunityService,
        notifier::{CommunityEvent, Notifier, NotifyError},
    },
};
use test_utils::{builder::TestBuilder, factory};

mod role;

/// Keeps every event it receives.
#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<CommunityEvent>>,
}

impl RecordingNotifier {
    fn events(&self) -> Vec<CommunityEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &CommunityEvent) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Fails every delivery.
struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _event: &CommunityEvent) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("audit sink offline".to_string()))
    }
}

/// Asserts the stored counters of a community equal the aggregates of its member rows.
async fn assert_counters_match(
    service: &CommunityService<'_>,
    community_id: i32,
) -> Result<(), AppError> {
    let community = service.get_community(community_id).await?;
    let stats = service.get_member_stats(community_id).await?;

    assert_eq!(community.total_count as u64, stats.total_members);
    assert_eq!(community.active_count as u64, stats.active_members);

    Ok(())
}
