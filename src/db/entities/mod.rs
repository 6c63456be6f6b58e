pub mod games;
pub mod participants;
pub mod teams;
pub mod users;

pub type User = users::Model;
pub type Game = games::Model;
pub type Participant = participants::Model;
pub type Team = teams::Model;

pub use games::{GameCategory, GameStatus, PricingType, SkillLevel};
pub use participants::ParticipantStatus;
