pub use super::community::Entity as Community;
pub use super::community_member::Entity as CommunityMember;
pub use super::community_relationship::Entity as CommunityRelationship;
pub use super::role::Entity as Role;
pub use super::user::Entity as User;
pub use super::user_role::Entity as UserRole;
