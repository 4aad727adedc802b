pub mod bracket;
pub mod matchup_card;
pub mod rules;
pub mod theme;
