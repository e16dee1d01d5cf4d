mod card;
mod expiry;

pub use card::Card;
pub use expiry::Expiry;
