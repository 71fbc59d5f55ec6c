pub mod perk;
