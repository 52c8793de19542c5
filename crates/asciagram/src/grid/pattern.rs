//! 3x3 neighborhood templates for classifying boundary cells.
//!
//! Each template is three rows of three slots. A slot is either a
//! literal character or one of the character classes below, optionally
//! prefixed with `%` to negate it:
//!
//! | class | matches                         |
//! |-------|---------------------------------|
//! | `.` `~` | anything                      |
//! | `b`   | any boundary char               |
//! | `!`   | anything but a boundary char    |
//! | `-`   | `-` `=`                         |
//! | `\|`  | `\|` `:`                        |
//! | `[`   | anything but `\|` `:`           |
//! | `^`   | `/` `\` `+` `\|` `:`            |
//! | `(`   | `-` `=` `/` `\` `+`             |
//! | `s`   | `-` `=` `+` `\|` `:`            |
//! | `S`   | `/` `\`                         |
//! | `1`-`8` | entry-direction classes       |
//!
//! The digit classes describe which line characters can enter a cell
//! from a given compass direction, numbered clockwise from north-west.

use std::sync::OnceLock;

/// The 3x3 character window around a cell, row-major, with `'\0'` for
/// positions outside the grid.
pub type Neighborhood = [[char; 3]; 3];

#[derive(Debug, Clone, Copy)]
pub struct GridPattern {
    rows: [&'static str; 3],
}

impl GridPattern {
    const fn new(top: &'static str, middle: &'static str, bottom: &'static str) -> Self {
        Self {
            rows: [top, middle, bottom],
        }
    }

    pub fn matches(&self, window: &Neighborhood) -> bool {
        self.rows
            .iter()
            .zip(window.iter())
            .all(|(row, cells)| row_matches(row, cells))
    }
}

/// True when any template in the group matches the window.
pub fn any_match(patterns: &[GridPattern], window: &Neighborhood) -> bool {
    patterns.iter().any(|pattern| pattern.matches(window))
}

fn row_matches(pattern: &str, cells: &[char; 3]) -> bool {
    let mut slots = pattern.chars();
    for &ch in cells {
        let (negated, class) = match slots.next() {
            Some('%') => match slots.next() {
                Some(class) => (true, class),
                None => return false,
            },
            Some(class) => (false, class),
            None => return false,
        };
        if class_matches(class, ch) == negated {
            return false;
        }
    }
    true
}

fn class_matches(class: char, ch: char) -> bool {
    match class {
        '.' | '~' => true,
        'b' => is_one_of(ch, "-=/\\+|:"),
        '!' => !is_one_of(ch, "-=/\\+|:"),
        '-' => is_one_of(ch, "-="),
        '|' => is_one_of(ch, "|:"),
        '[' => !is_one_of(ch, "|:"),
        '^' => is_one_of(ch, "/\\+|:"),
        '(' => is_one_of(ch, "-=/\\+"),
        's' => is_one_of(ch, "-=+|:"),
        'S' => is_one_of(ch, "/\\"),
        '1' | '5' => ch == '\\',
        '2' | '6' => is_one_of(ch, "|:+\\/"),
        '3' | '7' => ch == '/',
        '4' | '8' => is_one_of(ch, "-=+\\/"),
        literal => ch == literal,
    }
}

fn is_one_of(ch: char, group: &str) -> bool {
    group.contains(ch)
}

/// All template groups, grouped the way classification queries use them.
pub struct Criteria {
    pub cross: Vec<GridPattern>,
    pub t: Vec<GridPattern>,
    pub inverse_t: Vec<GridPattern>,
    pub k: Vec<GridPattern>,
    pub inverse_k: Vec<GridPattern>,
    pub intersection: Vec<GridPattern>,
    pub corner1: Vec<GridPattern>,
    pub corner2: Vec<GridPattern>,
    pub corner3: Vec<GridPattern>,
    pub corner4: Vec<GridPattern>,
    pub normal_corner: Vec<GridPattern>,
    pub round_corner: Vec<GridPattern>,
    pub corner: Vec<GridPattern>,
    pub stub: Vec<GridPattern>,
    pub horizontal_lines_end: Vec<GridPattern>,
    pub vertical_lines_end: Vec<GridPattern>,
    pub lines_end: Vec<GridPattern>,
    pub horizontal_cross_on_line: Vec<GridPattern>,
    pub vertical_cross_on_line: Vec<GridPattern>,
    pub cross_on_line: Vec<GridPattern>,
    pub star_on_line: Vec<GridPattern>,
    pub lone_diagonal: Vec<GridPattern>,
}

static CRITERIA: OnceLock<Criteria> = OnceLock::new();

/// Returns the shared template tables, building them on first use.
pub fn criteria() -> &'static Criteria {
    CRITERIA.get_or_init(Criteria::build)
}

impl Criteria {
    fn build() -> Self {
        let cross = vec![GridPattern::new(".6.", "4+8", ".2.")];
        let k = vec![GridPattern::new(".6.", "%4+8", ".2.")];
        let inverse_k = vec![GridPattern::new(".6.", "4+%8", ".2.")];
        let t = vec![GridPattern::new(".%6.", "4+8", ".2.")];
        let inverse_t = vec![GridPattern::new(".6.", "4+8", ".%2.")];

        let normal_corner1 = GridPattern::new(".[.", "~+(", ".^.");
        let normal_corner2 = GridPattern::new(".[.", "(+~", ".^.");
        let normal_corner3 = GridPattern::new(".^.", "(+~", ".[.");
        let normal_corner4 = GridPattern::new(".^.", "~+(", ".[.");

        let round_corner1 = GridPattern::new(".[.", "~/4", ".2.");
        let round_corner2 = GridPattern::new(".[.", "4\\~", ".2.");
        let round_corner3 = GridPattern::new(".6.", "4/~", ".[.");
        let round_corner4 = GridPattern::new(".6.", "~\\8", ".[.");

        let corner1 = vec![normal_corner1, round_corner1];
        let corner2 = vec![normal_corner2, round_corner2];
        let corner3 = vec![normal_corner3, round_corner3];
        let corner4 = vec![normal_corner4, round_corner4];

        let normal_corner = vec![normal_corner1, normal_corner2, normal_corner3, normal_corner4];
        let round_corner = vec![round_corner1, round_corner2, round_corner3, round_corner4];
        let mut corner = normal_corner.clone();
        corner.extend_from_slice(&round_corner);

        let mut intersection = Vec::new();
        for group in [&cross, &k, &t, &inverse_k, &inverse_t] {
            intersection.extend_from_slice(group);
        }

        let stub = vec![
            GridPattern::new("!^!", "!+!", ".!."),
            GridPattern::new("!^!", "!+!", ".-."),
            GridPattern::new("!!.", "(+!", "!!."),
            GridPattern::new("!!.", "(+|", "!!."),
            GridPattern::new(".!.", "!+!", "!^!"),
            GridPattern::new(".-.", "!+!", "!^!"),
            GridPattern::new(".!!", "!+(", ".!!"),
            GridPattern::new(".!!", "|+(", ".!!"),
        ];

        let vertical_lines_end = vec![
            GridPattern::new(".^.", ".|.", ".!."),
            GridPattern::new(".^.", ".|.", ".-."),
            GridPattern::new(".!.", ".|.", ".^."),
            GridPattern::new(".-.", ".|.", ".^."),
        ];
        let horizontal_lines_end = vec![
            GridPattern::new("...", "(-!", "..."),
            GridPattern::new("...", "(-|", "..."),
            GridPattern::new("...", "!-(", "..."),
            GridPattern::new("...", "|-(", "..."),
        ];
        let mut lines_end = horizontal_lines_end.clone();
        lines_end.extend_from_slice(&vertical_lines_end);
        lines_end.extend_from_slice(&stub);

        let horizontal_cross_on_line = vec![GridPattern::new("...", "(+(", "...")];
        let vertical_cross_on_line = vec![GridPattern::new(".^.", ".+.", ".^.")];
        let mut cross_on_line = horizontal_cross_on_line.clone();
        cross_on_line.extend_from_slice(&vertical_cross_on_line);

        let star_on_line = vec![
            GridPattern::new("...", "(*(", "..."),
            GridPattern::new("...", "!*(", "..."),
            GridPattern::new("...", "(*!", "..."),
            GridPattern::new(".^.", ".*.", ".^."),
            GridPattern::new(".!.", ".*.", ".^."),
            GridPattern::new(".^.", ".*.", ".!."),
        ];

        let lone_diagonal = vec![
            GridPattern::new(".%6%7", "%4/%8", "%3%2."),
            GridPattern::new("%1%6.", "%4\\%8", ".%2%5"),
        ];

        Self {
            cross,
            t,
            inverse_t,
            k,
            inverse_k,
            intersection,
            corner1,
            corner2,
            corner3,
            corner4,
            normal_corner,
            round_corner,
            corner,
            stub,
            horizontal_lines_end,
            vertical_lines_end,
            lines_end,
            horizontal_cross_on_line,
            vertical_cross_on_line,
            cross_on_line,
            star_on_line,
            lone_diagonal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(top: &str, middle: &str, bottom: &str) -> Neighborhood {
        let mut window = [['\0'; 3]; 3];
        for (y, row) in [top, middle, bottom].iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                window[y][x] = ch;
            }
        }
        window
    }

    #[test]
    fn test_cross_matches_four_way_intersection() {
        let w = window(" | ", "-+-", " | ");
        assert!(any_match(&criteria().cross, &w));
        assert!(any_match(&criteria().intersection, &w));
    }

    #[test]
    fn test_t_matches_top_edge_junction() {
        let w = window("   ", "-+-", " | ");
        assert!(any_match(&criteria().t, &w));
        assert!(!any_match(&criteria().cross, &w));
    }

    #[test]
    fn test_corner1_matches_box_top_left() {
        let w = window("   ", " +-", " | ");
        assert!(any_match(&criteria().corner1, &w));
        assert!(any_match(&criteria().normal_corner, &w));
        assert!(!any_match(&criteria().round_corner, &w));
    }

    #[test]
    fn test_round_corner_matches_slash() {
        let w = window("   ", " /-", " | ");
        assert!(any_match(&criteria().corner1, &w));
        assert!(any_match(&criteria().round_corner, &w));
    }

    #[test]
    fn test_lines_end_matches_dangling_dash() {
        let w = window("   ", "-- ", "   ");
        assert!(any_match(&criteria().horizontal_lines_end, &w));
        assert!(any_match(&criteria().lines_end, &w));
    }

    #[test]
    fn test_lone_diagonal_matches_isolated_slash() {
        let w = window("   ", " / ", "   ");
        assert!(any_match(&criteria().lone_diagonal, &w));
    }

    #[test]
    fn test_lone_diagonal_rejects_connected_slash() {
        let w = window("  /", " / ", "/  ");
        assert!(!any_match(&criteria().lone_diagonal, &w));
    }

    #[test]
    fn test_negated_class_rejects() {
        let w = window(" | ", "-+-", " | ");
        assert!(!any_match(&criteria().t, &w));
        assert!(!any_match(&criteria().k, &w));
    }
}
