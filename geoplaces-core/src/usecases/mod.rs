mod search_places;

pub use self::search_places::*;
