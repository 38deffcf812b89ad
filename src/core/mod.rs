/// Catalog filtering and sorting over loaded listings
pub mod catalog;
/// Broker contact formatting for the listing detail page
pub mod contact;
/// Carousel positions and the listing form's image selection
pub mod gallery;
/// Property repository - listing reads and authorized writes
pub mod property;
/// User administration - admin-only account management
pub mod user;
