//! Privacy level transitions.

use crate::{
    error::{business::BusinessRuleError, AppError},
    model::community::PrivacyLevel,
};

pub struct PrivacyTransitionValidator;

impl PrivacyTransitionValidator {
    /// Levels a community at `from` may move to.
    pub fn allowed_targets(from: PrivacyLevel) -> &'static [PrivacyLevel] {
        match from {
            PrivacyLevel::Public => &[PrivacyLevel::Private, PrivacyLevel::InvitationOnly],
            PrivacyLevel::Private => &[PrivacyLevel::Public, PrivacyLevel::InvitationOnly],
            PrivacyLevel::InvitationOnly => &[PrivacyLevel::Private],
        }
    }

    pub fn is_allowed(from: PrivacyLevel, to: PrivacyLevel) -> bool {
        Self::allowed_targets(from).contains(&to)
    }

    /// Fails with `InvalidPrivacyTransition` unless `to` is an allowed target of `from`.
    /// Staying at the same level is not a transition and fails too.
    pub fn validate(from: PrivacyLevel, to: PrivacyLevel) -> Result<(), AppError> {
        if Self::is_allowed(from, to) {
            Ok(())
        } else {
            Err(BusinessRuleError::InvalidPrivacyTransition { from, to }.into())
        }
    }
}
