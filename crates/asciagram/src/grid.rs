//! The character grid and the operations that prepare it for tracing.
//!
//! A [`TextGrid`] is loaded from source text, normalized (tabs expanded,
//! rows padded to equal width, a two-cell blank border added) and then
//! queried cell by cell. Coordinates are signed so that neighbor math
//! near the edges stays simple; reads outside the grid return `None`.

mod checks;
pub mod pattern;

use std::fmt;

use asciagram_core::color::Color;
use log::debug;

use crate::trace::CellSet;

/// Width of the blank margin added around loaded source text.
const BLANK_BORDER: usize = 2;

/// Marker used while flood-filling to find boundaries.
const FILL_MARKER: char = '\u{1}';

/// Shorthand color codes and their hex expansions.
const HUMAN_COLOR_CODES: [(&str, &str); 6] = [
    ("cGRE", "c99DD99"),
    ("cBLU", "c5555BB"),
    ("cPNK", "cFFAAAA"),
    ("cRED", "cEE3322"),
    ("cYEL", "cFFFF33"),
    ("cBLK", "c000000"),
];

/// A grid coordinate. `x` grows east, `y` grows south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn north(self) -> Self {
        Self::new(self.x, self.y - 1)
    }

    pub fn south(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    pub fn east(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    pub fn west(self) -> Self {
        Self::new(self.x - 1, self.y)
    }
}

// Row-major order, so sorted iteration scans the grid top to bottom.
impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangular grid of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid {
    rows: Vec<Vec<char>>,
}

impl TextGrid {
    /// An all-blank grid of the given dimensions.
    pub fn blank(width: i32, height: i32) -> Self {
        let width = width.max(0) as usize;
        let height = height.max(0) as usize;
        Self {
            rows: vec![vec![' '; width]; height],
        }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<char>>) -> Self {
        Self { rows }
    }

    /// Loads and normalizes source text.
    ///
    /// Tabs are expanded to the next `tab_size` stop, trailing
    /// whitespace-only lines are dropped, rows are padded to a uniform
    /// width and a blank border is added. Bullet markers are replaced
    /// with `•` and shorthand color codes are expanded to hex form.
    pub fn from_source(source: &str, tab_size: usize) -> Self {
        let tab_size = tab_size.max(1);
        let mut rows: Vec<Vec<char>> = Vec::new();
        for line in source.lines() {
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                if ch == '\t' {
                    let fill = tab_size - row.len() % tab_size;
                    row.extend(std::iter::repeat_n(' ', fill));
                } else {
                    row.push(ch);
                }
            }
            // shorthand codes expand to hex before rows are padded,
            // since the expansion changes row length
            let mut text: String = row.into_iter().collect();
            for (code, hex) in HUMAN_COLOR_CODES {
                text = text.replace(code, hex);
            }
            rows.push(text.chars().collect());
        }
        while rows
            .last()
            .is_some_and(|row| row.iter().all(|ch| ch.is_whitespace()))
        {
            rows.pop();
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, ' ');
        }

        let mut bordered: Vec<Vec<char>> =
            vec![vec![' '; width + 2 * BLANK_BORDER]; rows.len() + 2 * BLANK_BORDER];
        for (y, row) in rows.iter().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                bordered[y + BLANK_BORDER][x + BLANK_BORDER] = ch;
            }
        }

        let mut grid = Self { rows: bordered };
        grid.replace_bullets();
        debug!(width = grid.width(), height = grid.height(); "grid loaded");
        grid
    }

    pub fn width(&self) -> i32 {
        self.rows.first().map_or(0, |row| row.len() as i32)
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    pub fn is_out_of_bounds(&self, c: Cell) -> bool {
        c.x < 0 || c.y < 0 || c.x >= self.width() || c.y >= self.height()
    }

    /// The character at `c`, or `None` outside the grid.
    pub fn get(&self, c: Cell) -> Option<char> {
        if self.is_out_of_bounds(c) {
            return None;
        }
        Some(self.rows[c.y as usize][c.x as usize])
    }

    /// The character at `(x, y)`, with `'\0'` standing in for cells
    /// outside the grid.
    pub(crate) fn char_at(&self, x: i32, y: i32) -> char {
        self.get(Cell::new(x, y)).unwrap_or('\0')
    }

    /// Sets the character at `c`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, c: Cell, ch: char) {
        if self.is_out_of_bounds(c) {
            return;
        }
        self.rows[c.y as usize][c.x as usize] = ch;
    }

    /// True when the cell is inside the grid and holds a space.
    pub fn is_blank(&self, c: Cell) -> bool {
        self.get(c) == Some(' ')
    }

    /// True when the cell holds a space or lies outside the grid.
    pub fn is_blank_or_missing(&self, c: Cell) -> bool {
        match self.get(c) {
            None => true,
            Some(ch) => ch == ' ',
        }
    }

    /// The 3x3 character window centered on `c`.
    pub fn neighborhood(&self, c: Cell) -> pattern::Neighborhood {
        let mut window = [['\0'; 3]; 3];
        for (dy, row) in window.iter_mut().enumerate() {
            for (dx, slot) in row.iter_mut().enumerate() {
                *slot = self.char_at(c.x + dx as i32 - 1, c.y + dy as i32 - 1);
            }
        }
        window
    }

    /// A copy of the rectangle at `(x, y)` with the given dimensions.
    /// Cells outside the source read as blank.
    pub fn sub_grid(&self, x: i32, y: i32, width: i32, height: i32) -> TextGrid {
        let mut rows = Vec::with_capacity(height.max(0) as usize);
        for yi in y..y + height {
            let mut row = Vec::with_capacity(width.max(0) as usize);
            for xi in x..x + width {
                row.push(self.get(Cell::new(xi, yi)).unwrap_or(' '));
            }
            rows.push(row);
        }
        TextGrid { rows }
    }

    /// Copies the characters of `cells` from `source` into this grid.
    pub fn copy_selected(&mut self, cells: &CellSet, source: &TextGrid) {
        for c in cells.sorted_cells() {
            if let Some(ch) = source.get(c) {
                self.set(c, ch);
            }
        }
    }

    /// Writes `ch` into every cell of `cells`.
    pub fn fill_cells(&mut self, cells: &CellSet, ch: char) {
        for c in cells.sorted_cells() {
            self.set(c, ch);
        }
    }

    /// All cells holding a non-blank character.
    pub fn all_non_blank(&self) -> CellSet {
        let mut cells = CellSet::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = Cell::new(x, y);
                if !self.is_blank(c) {
                    cells.add(c);
                }
            }
        }
        cells
    }

    /// All boundary cells, as recognized by [`TextGrid::is_boundary`].
    pub fn all_boundaries(&self) -> CellSet {
        let mut cells = CellSet::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = Cell::new(x, y);
                if self.is_boundary(c) {
                    cells.add(c);
                }
            }
        }
        cells
    }

    /// Blank cells with non-blank neighbors on both sides, as found
    /// inside multi-word labels.
    pub fn all_blanks_between_characters(&self) -> CellSet {
        let mut cells = CellSet::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = Cell::new(x, y);
                if self.is_blank(c) && !self.is_blank(c.west()) && !self.is_blank(c.east()) {
                    cells.add(c);
                }
            }
        }
        cells
    }

    pub fn has_blank_cells(&self) -> bool {
        self.rows.iter().any(|row| row.contains(&' '))
    }

    /// Flood-fills the area of the seed's character with `ch` and
    /// returns the filled cells. Returns an empty set when the seed is
    /// outside the grid or already holds `ch`.
    pub fn fill_continuous_area(&mut self, seed: Cell, ch: char) -> CellSet {
        let mut filled = CellSet::new();
        let Some(old) = self.get(seed) else {
            return filled;
        };
        if old == ch {
            return filled;
        }
        let mut stack = vec![seed];
        while let Some(c) = stack.pop() {
            self.set(c, ch);
            filled.add(c);
            for n in [c.north(), c.south(), c.east(), c.west()] {
                if self.get(n) == Some(old) {
                    stack.push(n);
                }
            }
        }
        filled
    }

    /// Flood-fills from `seed` and returns the `*` cells adjacent to
    /// the filled area. The grid is consumed by fill markers, so call
    /// this on a scratch copy.
    pub fn find_boundaries_expanding_from(&mut self, seed: Cell) -> CellSet {
        let mut boundaries = CellSet::new();
        let Some(old) = self.get(seed) else {
            return boundaries;
        };
        if old == FILL_MARKER {
            return boundaries;
        }
        let mut stack = vec![seed];
        while let Some(c) = stack.pop() {
            self.set(c, FILL_MARKER);
            for n in [c.north(), c.south(), c.east(), c.west()] {
                match self.get(n) {
                    Some(ch) if ch == old => stack.push(n),
                    Some('*') => boundaries.add(n),
                    _ => {}
                }
            }
        }
        boundaries
    }

    /// Replaces letters and digits embedded in lines with the line
    /// character that keeps the line continuous (`-`, `|` or `+`).
    pub fn replace_type_on_line(&mut self) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = Cell::new(x, y);
                if !self.get(c).is_some_and(char::is_alphanumeric) {
                    continue;
                }
                let on_horizontal = self.is_on_horizontal_line(c);
                let on_vertical = self.is_on_vertical_line(c);
                match (on_horizontal, on_vertical) {
                    (true, true) => self.set(c, '+'),
                    (true, false) => self.set(c, '-'),
                    (false, true) => self.set(c, '|'),
                    (false, false) => {}
                }
            }
        }
    }

    /// Replaces point markers that sit on a line with the underlying
    /// line character, so tracing can pass through them.
    pub fn replace_point_markers_on_line(&mut self) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = Cell::new(x, y);
                if self.get(c) != Some('*') || !self.is_star_on_line(c) {
                    continue;
                }
                let on_horizontal =
                    self.is_horizontal_line(c.east()) || self.is_horizontal_line(c.west());
                let on_vertical =
                    self.is_vertical_line(c.north()) || self.is_vertical_line(c.south());
                match (on_horizontal, on_vertical) {
                    (true, true) => self.set(c, '+'),
                    (true, false) => self.set(c, '-'),
                    (false, true) => self.set(c, '|'),
                    (false, false) => {}
                }
            }
        }
    }

    /// Cells holding a point marker that sits on a line.
    pub fn find_point_markers_on_line(&self) -> Vec<Cell> {
        let mut markers = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = Cell::new(x, y);
                if self.get(c) == Some('*') && self.is_star_on_line(c) {
                    markers.push(c);
                }
            }
        }
        markers
    }

    /// Cells holding an arrowhead character.
    pub fn find_arrowheads(&self) -> Vec<Cell> {
        let mut arrowheads = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = Cell::new(x, y);
                if self.is_arrowhead(c) {
                    arrowheads.push(c);
                }
            }
        }
        arrowheads
    }

    /// Inline color codes of the form `cRRGGBB`, with the cell of the
    /// leading `c`.
    pub fn find_color_codes(&self) -> Vec<(Cell, Color)> {
        let mut codes = Vec::new();
        for y in 0..self.height() {
            for x in 0..(self.width() - 6).max(0) {
                if self.char_at(x, y) != 'c' {
                    continue;
                }
                let digits: Vec<char> = (1..7).map(|i| self.char_at(x + i, y)).collect();
                if !digits.iter().all(|ch| is_uppercase_hex(*ch)) {
                    continue;
                }
                let r = hex_pair(digits[0], digits[1]);
                let g = hex_pair(digits[2], digits[3]);
                let b = hex_pair(digits[4], digits[5]);
                codes.push((Cell::new(x, y), Color::from_rgb8(r, g, b)));
            }
        }
        codes
    }

    /// Inline markup tags of the form `{tag}`, with the cell of the
    /// opening brace.
    pub fn find_markup_tags(&self) -> Vec<(Cell, String)> {
        let mut tags = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.char_at(x, y) != '{' {
                    continue;
                }
                let mut tag = String::new();
                let mut xi = x + 1;
                while xi < self.width() {
                    match self.char_at(xi, y) {
                        '}' => break,
                        '{' => {
                            tag.clear();
                            break;
                        }
                        ch => tag.push(ch),
                    }
                    xi += 1;
                }
                if xi < self.width() && self.char_at(xi, y) == '}' && !tag.is_empty() {
                    tags.push((Cell::new(x, y), tag));
                }
            }
        }
        tags
    }

    /// Blanks out everything that is not label text: arrowheads, color
    /// codes, boundaries and markup tags.
    pub fn remove_non_text(&mut self) {
        for c in self.find_arrowheads() {
            self.set(c, ' ');
        }
        let codes: Vec<Cell> = self.find_color_codes().into_iter().map(|(c, _)| c).collect();
        for c in codes {
            self.write_string_to(c, "       ");
        }
        let boundaries = self.all_boundaries();
        self.fill_cells(&boundaries, ' ');
        let tags = self.find_markup_tags();
        for (c, tag) in tags {
            self.write_string_to(c, &" ".repeat(2 + tag.chars().count()));
        }
    }

    /// Writes `s` into the row starting at `c`, clipping at the edge.
    pub fn write_string_to(&mut self, c: Cell, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            self.set(Cell::new(c.x + i as i32, c.y), ch);
        }
    }

    /// Finds the contiguous strings of the grid, reading left to right.
    /// A string ends at two consecutive blanks, so single spaces inside
    /// a label do not split it.
    pub fn find_strings(&self) -> Vec<(Cell, String)> {
        let mut strings = Vec::new();
        for y in 0..self.height() {
            let mut x = 0;
            while x < self.width() {
                if self.is_blank(Cell::new(x, y)) {
                    x += 1;
                    continue;
                }
                let start = Cell::new(x, y);
                let mut s = String::new();
                s.push(self.char_at(x, y));
                x += 1;
                let mut ch = self.char_at(x, y);
                loop {
                    s.push(ch);
                    x += 1;
                    ch = self.char_at(x, y);
                    let next = self.char_at(x + 1, y);
                    if (ch == ' ' || ch == '\0') && (next == ' ' || next == '\0') {
                        break;
                    }
                }
                strings.push((start, s));
                x += 1;
            }
        }
        strings
    }

    /// Number of other strings that start in the same column as `c`.
    pub fn other_strings_start_in_same_column(&self, c: Cell) -> usize {
        self.find_strings()
            .iter()
            .filter(|(start, _)| start.x == c.x && start.y != c.y)
            .count()
    }

    /// Number of other strings whose last character falls in the same
    /// column as `c`.
    pub fn other_strings_end_in_same_column(&self, c: Cell) -> usize {
        self.find_strings()
            .iter()
            .filter(|(start, s)| {
                let end_x = start.x + s.chars().count() as i32 - 1;
                end_x == c.x && start.y != c.y
            })
            .count()
    }

    fn replace_bullets(&mut self) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = Cell::new(x, y);
                if self.is_bullet(c) {
                    self.set(c, ' ');
                    self.set(c.east(), '\u{2022}');
                }
            }
        }
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for &ch in row {
                let visible = if ch == '\0' { '\u{2400}' } else { ch };
                write!(f, "{visible}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn is_uppercase_hex(ch: char) -> bool {
    ch.is_ascii_digit() || ('A'..='F').contains(&ch)
}

fn hex_pair(high: char, low: char) -> u8 {
    (hex_value(high) << 4) | hex_value(low)
}

fn hex_value(ch: char) -> u8 {
    match ch {
        '0'..='9' => ch as u8 - b'0',
        'A'..='F' => ch as u8 - b'A' + 10,
        _ => 0,
    }
}
