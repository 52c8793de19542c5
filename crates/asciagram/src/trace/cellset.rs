//! Sets of grid cells and their open/closed classification.

use std::collections::HashSet;

use log::debug;

use super::AbstractionGrid;
use crate::grid::{Cell, TextGrid};

/// What a traced boundary set turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    /// A polyline with at least one dangling end.
    Open,
    /// A loop that encloses an area.
    Closed,
    /// A closed outline with open lines attached to it.
    Mixed,
    /// The set encloses an area but could not be traced as a loop.
    HasClosedArea,
    /// Tracing could not decide; the set branches.
    Undetermined,
}

/// An unordered set of cells. Iteration order is unspecified; use
/// [`CellSet::sorted_cells`] wherever order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet {
    cells: HashSet<Cell>,
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn add(&mut self, c: Cell) {
        self.cells.insert(c);
    }

    pub fn remove(&mut self, c: Cell) {
        self.cells.remove(&c);
    }

    pub fn contains(&self, c: Cell) -> bool {
        self.cells.contains(&c)
    }

    pub fn add_all(&mut self, other: &CellSet) {
        self.cells.extend(other.cells.iter().copied());
    }

    /// Removes every cell of `other` from this set.
    pub fn subtract(&mut self, other: &CellSet) {
        for c in &other.cells {
            self.cells.remove(c);
        }
    }

    pub fn has_common_cells(&self, other: &CellSet) -> bool {
        self.cells.iter().any(|c| other.contains(*c))
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Cells in row-major order.
    pub fn sorted_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.cells.iter().copied().collect();
        cells.sort();
        cells
    }

    /// The first cell in row-major order.
    pub fn first_cell(&self) -> Option<Cell> {
        self.cells.iter().copied().min()
    }

    /// The bounding rectangle of the set, as min and max cells.
    pub fn bounds(&self) -> Option<(Cell, Cell)> {
        let mut cells = self.cells.iter();
        let first = cells.next()?;
        let mut min = *first;
        let mut max = *first;
        for c in cells {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Some((min, max))
    }

    /// The set shifted by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> CellSet {
        self.cells
            .iter()
            .map(|c| Cell::new(c.x + dx, c.y + dy))
            .collect()
    }

    /// Maps a triple-resolution set back down to source resolution.
    pub fn scaled_one_third(&self) -> CellSet {
        self.cells
            .iter()
            .map(|c| Cell::new(c.x / 3, c.y / 3))
            .collect()
    }

    /// Splits the set into its orthogonally connected components, in
    /// row-major order of their first cells.
    pub fn distinct_components(&self) -> Vec<CellSet> {
        let Some((_, max)) = self.bounds() else {
            return Vec::new();
        };
        let mut plot = TextGrid::blank(max.x + 2, max.y + 2);
        for c in self.iter() {
            plot.set(c, '*');
        }
        let mut components = Vec::new();
        for c in self.sorted_cells() {
            if plot.is_blank_or_missing(c) {
                continue;
            }
            components.push(plot.fill_continuous_area(c, ' '));
        }
        components
    }

    /// Classifies the set by tracing it on `grid`.
    pub fn kind(&self, grid: &TextGrid) -> SetKind {
        if self.len() <= 1 {
            return SetKind::Open;
        }
        match self.kind_by_trace(grid) {
            kind @ (SetKind::Open | SetKind::Closed) => kind,
            _ => match self.kind_by_fill(grid) {
                SetKind::HasClosedArea => SetKind::Mixed,
                SetKind::Open => SetKind::Open,
                _ => SetKind::Undetermined,
            },
        }
    }

    /// Walks the set cell to cell. Returning to the start means the
    /// set is a closed loop; a dead end means it is open; a branch
    /// leaves it undetermined.
    fn kind_by_trace(&self, grid: &TextGrid) -> SetKind {
        let mut work = TextGrid::blank(grid.width(), grid.height());
        work.copy_selected(self, grid);

        let sorted = self.sorted_cells();
        let Some(start) = sorted
            .iter()
            .copied()
            .find(|c| work.is_lines_end(*c))
            .or(sorted.first().copied())
        else {
            return SetKind::Open;
        };

        let Some(mut cell) = work.follow_cell(start, None).first_cell() else {
            return SetKind::Open;
        };
        let mut prev = start;
        let mut steps = 0;
        while cell != start {
            // a loop revisits its start within one pass over the set
            steps += 1;
            if steps > self.len() {
                return SetKind::Undetermined;
            }
            let nexts = work.follow_cell(cell, Some(prev));
            if nexts.len() > 1 {
                return SetKind::Undetermined;
            }
            match nexts.first_cell() {
                None => return SetKind::Open,
                Some(next) => {
                    prev = cell;
                    cell = next;
                }
            }
        }
        SetKind::Closed
    }

    /// Redraws the set at triple resolution and flood-fills from a
    /// blank cell. Any blank cells left afterwards are enclosed by the
    /// set.
    fn kind_by_fill(&self, grid: &TextGrid) -> SetKind {
        let Some((min, max)) = self.bounds() else {
            return SetKind::Undetermined;
        };
        let translated = self.translated(-min.x + 1, -min.y + 1);
        let sub = grid.sub_grid(min.x - 1, min.y - 1, max.x - min.x + 3, max.y - min.y + 3);
        let mut fine = AbstractionGrid::new(&sub, &translated).into_grid();

        let mut seed = None;
        'scan: for y in 0..fine.height() {
            for x in 0..fine.width() {
                if fine.is_blank(Cell::new(x, y)) {
                    seed = Some(Cell::new(x, y));
                    break 'scan;
                }
            }
        }
        let Some(seed) = seed else {
            debug!("no blank cell to fill from");
            return SetKind::Undetermined;
        };
        fine.fill_continuous_area(seed, '*');
        if fine.has_blank_cells() {
            SetKind::HasClosedArea
        } else {
            SetKind::Open
        }
    }

    /// Splits a set that is a closed outline with lines hanging off it
    /// into the closed part and the open parts.
    ///
    /// Walks inward from each line end until an intersection is
    /// reached; the walked cells form an open set, and whatever remains
    /// is the closed outline.
    pub fn break_truly_mixed(&self, grid: &TextGrid) -> Vec<CellSet> {
        let mut work = TextGrid::blank(grid.width(), grid.height());
        work.copy_selected(self, grid);

        let mut visited = CellSet::new();
        let mut result = Vec::new();
        for start in self.sorted_cells() {
            if !work.is_lines_end(start) || visited.contains(start) {
                continue;
            }
            let mut open = CellSet::new();
            open.add(start);
            let mut prev = start;
            let mut cell = match work.follow_cell(start, None).first_cell() {
                Some(next) => next,
                None => continue,
            };
            loop {
                if work.is_intersection(cell) {
                    break;
                }
                open.add(cell);
                let nexts = work.follow_cell(cell, Some(prev));
                match nexts.first_cell() {
                    Some(next) if nexts.len() == 1 => {
                        prev = cell;
                        cell = next;
                    }
                    _ => break,
                }
            }
            visited.add_all(&open);
            result.push(open);
        }

        let mut remainder = self.clone();
        for open in &result {
            remainder.subtract(open);
        }
        if !remainder.is_empty() {
            result.push(remainder);
        }
        result
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
