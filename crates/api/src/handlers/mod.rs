pub mod perks;
