//! Cell classification and line following.
//!
//! Classification is driven by the template tables in [`pattern`]: a
//! cell's 3x3 neighborhood is matched against a template group to
//! decide whether it is a corner, an intersection, a line end and so
//! on. [`TextGrid::follow_cell`] uses the same classes to enumerate
//! the neighbors a line trace can continue into.

use log::debug;

use super::{Cell, TextGrid, pattern};
use crate::trace::CellSet;

const BOUNDARY_CHARS: &str = "/\\|-*=:";
const HORIZONTAL_LINE_CHARS: &str = "-=";
const VERTICAL_LINE_CHARS: &str = "|:";
const DASHED_LINE_CHARS: &str = ":~=";

/// Side of a cell a line can enter through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    North,
    East,
    South,
    West,
}

/// Characters that can enter a cell from the given direction.
fn entry_chars(direction: Direction) -> &'static str {
    match direction {
        Direction::North => "|:+\\/",
        Direction::East => "-=+\\/",
        Direction::South => "|:+\\/",
        Direction::West => "-=+\\/",
    }
}

fn is_one_of(ch: Option<char>, group: &str) -> bool {
    ch.is_some_and(|ch| group.contains(ch))
}

impl TextGrid {
    /// True when the cell takes part in a shape outline. Plain line
    /// characters qualify directly; `+`, `/` and `\` only qualify in a
    /// context where they join lines, and isolated diagonals do not.
    pub fn is_boundary(&self, c: Cell) -> bool {
        let Some(ch) = self.get(c) else { return false };
        match ch {
            '+' | '/' | '\\' => {
                self.is_intersection(c)
                    || self.is_corner(c)
                    || self.is_stub(c)
                    || self.is_cross_on_line(c)
            }
            _ => {
                if !BOUNDARY_CHARS.contains(ch) {
                    return false;
                }
                !self.is_lone_diagonal(c)
            }
        }
    }

    pub fn is_horizontal_line(&self, c: Cell) -> bool {
        is_one_of(self.get(c), HORIZONTAL_LINE_CHARS)
    }

    pub fn is_vertical_line(&self, c: Cell) -> bool {
        is_one_of(self.get(c), VERTICAL_LINE_CHARS)
    }

    pub fn is_arrowhead(&self, c: Cell) -> bool {
        self.is_north_arrowhead(c)
            || self.is_south_arrowhead(c)
            || self.is_east_arrowhead(c)
            || self.is_west_arrowhead(c)
    }

    pub fn is_north_arrowhead(&self, c: Cell) -> bool {
        self.get(c) == Some('^')
    }

    pub fn is_east_arrowhead(&self, c: Cell) -> bool {
        self.get(c) == Some('>')
    }

    pub fn is_west_arrowhead(&self, c: Cell) -> bool {
        self.get(c) == Some('<')
    }

    /// `v` is also a letter, so a south arrowhead needs a vertical line
    /// above it.
    pub fn is_south_arrowhead(&self, c: Cell) -> bool {
        is_one_of(self.get(c), "vV") && self.is_vertical_line(c.north())
    }

    /// A list bullet: `o` or `*` flanked by blanks, with text following.
    pub fn is_bullet(&self, c: Cell) -> bool {
        is_one_of(self.get(c), "o*")
            && self.is_blank(c.east())
            && self.is_blank(c.west())
            && self
                .get(Cell::new(c.x + 2, c.y))
                .is_some_and(|ch| ch.is_alphanumeric())
    }

    pub fn cell_contains_dashed_line_char(&self, c: Cell) -> bool {
        is_one_of(self.get(c), DASHED_LINE_CHARS)
    }

    pub fn is_intersection(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().intersection)
    }

    pub fn is_cross(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().cross)
    }

    pub fn is_t(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().t)
    }

    pub fn is_inverse_t(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().inverse_t)
    }

    pub fn is_k(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().k)
    }

    pub fn is_inverse_k(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().inverse_k)
    }

    pub fn is_corner(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().corner)
    }

    pub fn is_normal_corner(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().normal_corner)
    }

    pub fn is_round_corner(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().round_corner)
    }

    pub fn is_corner1(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().corner1)
    }

    pub fn is_corner2(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().corner2)
    }

    pub fn is_corner3(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().corner3)
    }

    pub fn is_corner4(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().corner4)
    }

    pub fn is_stub(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().stub)
    }

    pub fn is_lines_end(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().lines_end)
    }

    pub fn is_horizontal_lines_end(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().horizontal_lines_end)
    }

    pub fn is_vertical_lines_end(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().vertical_lines_end)
    }

    pub fn is_cross_on_line(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().cross_on_line)
    }

    pub fn is_horizontal_cross_on_line(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().horizontal_cross_on_line)
    }

    pub fn is_vertical_cross_on_line(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().vertical_cross_on_line)
    }

    pub fn is_star_on_line(&self, c: Cell) -> bool {
        self.matches(c, &pattern::criteria().star_on_line)
    }

    pub fn is_lone_diagonal(&self, c: Cell) -> bool {
        is_one_of(self.get(c), "/\\") && self.matches(c, &pattern::criteria().lone_diagonal)
    }

    /// A cell that contributes a vertex to a traced polyline.
    pub fn is_point_cell(&self, c: Cell) -> bool {
        self.is_corner(c) || self.is_intersection(c) || self.is_stub(c)
    }

    pub(crate) fn is_on_horizontal_line(&self, c: Cell) -> bool {
        self.is_horizontal_line(c.west()) && self.is_horizontal_line(c.east())
    }

    pub(crate) fn is_on_vertical_line(&self, c: Cell) -> bool {
        self.is_vertical_line(c.north()) && self.is_vertical_line(c.south())
    }

    fn matches(&self, c: Cell, patterns: &[pattern::GridPattern]) -> bool {
        pattern::any_match(patterns, &self.neighborhood(c))
    }

    /// True when the character in `from` can connect into `c` from the
    /// given side.
    fn has_entry_from(&self, from: Cell, direction: Direction) -> bool {
        is_one_of(self.get(from), entry_chars(direction))
    }

    /// The neighbors a line trace at `c` can continue into, excluding
    /// `blocked` (normally the cell the trace came from). Returns an
    /// empty set for cells that do not classify as part of a line.
    pub fn follow_cell(&self, c: Cell, blocked: Option<Cell>) -> CellSet {
        let mut nexts = if self.is_intersection(c) {
            self.follow_intersection(c)
        } else if self.is_corner(c) {
            self.follow_corner(c)
        } else if self.is_horizontal_line(c) {
            self.follow_line(c, [c.east(), c.west()])
        } else if self.is_vertical_line(c) {
            self.follow_line(c, [c.north(), c.south()])
        } else if self.is_stub(c) {
            self.follow_stub(c)
        } else if self.is_cross_on_line(c) {
            self.follow_cross_on_line(c)
        } else {
            debug!(x = c.x, y = c.y; "cell cannot be followed");
            CellSet::new()
        };
        if let Some(blocked) = blocked {
            nexts.remove(blocked);
        }
        nexts
    }

    fn follow_intersection(&self, c: Cell) -> CellSet {
        let mut nexts = CellSet::new();
        if self.has_entry_from(c.north(), Direction::South) {
            nexts.add(c.north());
        }
        if self.has_entry_from(c.south(), Direction::North) {
            nexts.add(c.south());
        }
        if self.has_entry_from(c.east(), Direction::West) {
            nexts.add(c.east());
        }
        if self.has_entry_from(c.west(), Direction::East) {
            nexts.add(c.west());
        }
        nexts
    }

    fn follow_corner(&self, c: Cell) -> CellSet {
        let mut nexts = CellSet::new();
        if self.is_corner1(c) {
            nexts.add(c.south());
            nexts.add(c.east());
        } else if self.is_corner2(c) {
            nexts.add(c.south());
            nexts.add(c.west());
        } else if self.is_corner3(c) {
            nexts.add(c.north());
            nexts.add(c.west());
        } else if self.is_corner4(c) {
            nexts.add(c.north());
            nexts.add(c.east());
        }
        nexts
    }

    fn follow_line(&self, _c: Cell, candidates: [Cell; 2]) -> CellSet {
        let mut nexts = CellSet::new();
        for n in candidates {
            if self.is_boundary(n) {
                nexts.add(n);
            }
        }
        nexts
    }

    fn follow_stub(&self, c: Cell) -> CellSet {
        let mut nexts = CellSet::new();
        for n in [c.north(), c.south(), c.east(), c.west()] {
            if self.is_boundary(n) {
                nexts.add(n);
            }
        }
        nexts
    }

    fn follow_cross_on_line(&self, c: Cell) -> CellSet {
        let mut nexts = CellSet::new();
        if self.is_horizontal_cross_on_line(c) {
            nexts.add(c.east());
            nexts.add(c.west());
        } else if self.is_vertical_cross_on_line(c) {
            nexts.add(c.north());
            nexts.add(c.south());
        }
        nexts
    }
}
