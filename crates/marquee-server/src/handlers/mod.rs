pub mod announcements;
pub mod banner;
pub mod preferences;
