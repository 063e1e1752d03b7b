mod community;
mod member;
mod relationship;
mod user;
