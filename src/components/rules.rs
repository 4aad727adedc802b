use cc_api::view::{ENTRY_FEE, PRIZE_POOL};
use cc_api::{GROUP_PLAY_WEEKS, TOTAL_TEAMS};
use tui::style::{Color, Style};
use tui::text::{Line, Span};

use crate::components::theme::{Palette, Theme, resolve};

const CHAMPION_SHARE: u32 = 60;
const RUNNER_UP_SHARE: u32 = 40;

fn payout(share: u32) -> u32 {
    PRIZE_POOL * share / 100
}

/// Section title plus its bullet points.
fn sections() -> Vec<(&'static str, Vec<String>)> {
    vec![
        (
            "Overview",
            vec![
                format!(
                    "{TOTAL_TEAMS} teams from the ADL and BDL dynasty leagues meet in a side tournament \
                     played with the lineups you already set each week."
                ),
                format!("Group play runs {GROUP_PLAY_WEEKS} weeks, then the top 16 play a single-elimination bracket."),
            ],
        ),
        (
            "Timeline",
            vec![
                "NFL Week 8: the draw".into(),
                format!("NFL Weeks 9-13: group play (weeks 1-{GROUP_PLAY_WEEKS})"),
                "NFL Week 14: Sweet 16".into(),
                "NFL Week 15: Elite 8".into(),
                "NFL Week 16: Final 4".into(),
                "NFL Week 17: Championship".into(),
            ],
        ),
        (
            "Draw & Seeding",
            vec![
                "Tier 1: the top 4 teams from each league (8 teams)".into(),
                "Tier 2: league ranks 5-8 (4 ADL + 4 BDL)".into(),
                "Tier 3: league ranks 9-12 (4 ADL + 4 BDL)".into(),
                "Groups A-D hold 6 teams each, 3 from each league".into(),
                "Seeds 1-2 come from Tier 1, seeds 3-4 from Tier 2, seeds 5-6 from Tier 3".into(),
            ],
        ),
        (
            "Group Play",
            vec![
                "Each team plays every other team in its group once".into(),
                "A head-to-head tie goes to the team with more bench points, then a coin flip".into(),
                "The top 4 in each group advance to the bracket".into(),
                "Equal records are separated by total group-play points".into(),
            ],
        ),
        (
            "Bracket",
            vec![
                "Sweet 16, Elite 8, Final 4 and Championship, one week per round".into(),
                "Higher score advances; ties use the same bench-points rule".into(),
            ],
        ),
        (
            "Prizes",
            vec![
                format!("${ENTRY_FEE} entry per team, ${PRIZE_POOL} pool"),
                format!("Champion: {CHAMPION_SHARE}% (${})", payout(CHAMPION_SHARE)),
                format!("Runner-up: {RUNNER_UP_SHARE}% (${})", payout(RUNNER_UP_SHARE)),
            ],
        ),
        (
            "Notes",
            vec![
                "One lineup counts for both your league game and your cup game".into(),
                "The commissioner collects entry fees before the draw".into(),
                "The champion keeps the title until someone takes it".into(),
            ],
        ),
    ]
}

pub fn rules_lines(theme: Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, bullets) in sections() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(title, resolve(Palette::Accent, theme))));
        for bullet in bullets {
            lines.push(Line::from(vec![
                Span::styled("  • ", resolve(Palette::Dim, theme)),
                Span::styled(bullet, Style::default().fg(Color::Gray)),
            ]));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> String {
        rules_lines(Theme::Dark)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn payouts_split_the_pool() {
        assert_eq!(payout(CHAMPION_SHARE), 360);
        assert_eq!(payout(RUNNER_UP_SHARE), 240);
        assert_eq!(payout(CHAMPION_SHARE) + payout(RUNNER_UP_SHARE), PRIZE_POOL);
    }

    #[test]
    fn every_section_is_rendered() {
        let text = text();
        for title in ["Overview", "Timeline", "Draw & Seeding", "Group Play", "Bracket", "Prizes", "Notes"] {
            assert!(text.contains(title), "missing {title}");
        }
        assert!(text.contains("$600 pool"));
        assert!(text.contains("Champion: 60% ($360)"));
    }
}
