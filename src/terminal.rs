use crate::{render::CellView, view::View};
use crossterm::{
    queue,
    style::{self, Print, ResetColor, SetBackgroundColor},
};
use pixelwall_common::{Color, GridShape, Rgb};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    TrueColor,
    /// `..` for untouched cells, `##` for painted ones
    Plain,
}

pub struct TerminalView<W> {
    out: W,
    palette: Palette,
    fallback: Rgb,
    grid: Option<GridShape>,
    cells: Vec<CellView>,
    loading: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, palette: Palette, default_color: &Color) -> Self {
        let fallback = default_color.rgb().unwrap_or(Rgb { r: 0, g: 0, b: 0 });

        Self {
            out,
            palette,
            fallback,
            grid: None,
            cells: Vec::new(),
            loading: true,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_grid(&mut self) -> io::Result<()> {
        let Some(grid) = self.grid else {
            return Ok(());
        };

        queue!(self.out, Print("\n    "))?;
        for col in 0..grid.side() {
            queue!(self.out, Print(format!("{:>2}", col % 100)))?;
        }
        queue!(self.out, Print("\n"))?;

        for (row, lane) in self.cells.chunks(grid.side() as usize).enumerate() {
            queue!(self.out, Print(format!("{row:>3} ")))?;

            for cell in lane {
                match self.palette {
                    Palette::TrueColor => {
                        let Rgb { r, g, b } = cell.color.rgb().unwrap_or(self.fallback);
                        queue!(
                            self.out,
                            SetBackgroundColor(style::Color::Rgb { r, g, b }),
                            Print("  "),
                            ResetColor
                        )?;
                    }
                    Palette::Plain => {
                        let rgb = cell.color.rgb().unwrap_or(self.fallback);
                        let glyph = if rgb == self.fallback { ".." } else { "##" };
                        queue!(self.out, Print(glyph))?;
                    }
                }
            }

            queue!(self.out, Print("\n"))?;
        }

        self.out.flush()
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        queue!(self.out, Print(line), Print("\n"))?;
        self.out.flush()
    }

    fn report(result: io::Result<()>) {
        if let Err(error) = result {
            warn!(?error, "terminal write failed");
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if !loading {
            let result = self.draw_grid();
            Self::report(result);
        }
    }

    fn set_loading_text(&mut self, text: &str) {
        let result = self.write_line(text);
        Self::report(result);
    }

    fn replace_grid(&mut self, grid: GridShape, cells: &[CellView]) {
        self.grid = Some(grid);
        self.cells = cells.to_vec();

        if !self.loading {
            let result = self.draw_grid();
            Self::report(result);
        }
    }

    fn update_cell(&mut self, cell: &CellView) {
        if let Some(slot) = self.cells.get_mut(cell.id.index()) {
            slot.clone_from(cell);
        }

        let result = self.draw_grid();
        Self::report(result);
    }

    fn open_picker(&mut self, cell: &CellView) {
        let prompt = format!(
            "{}. Enter a color (current {}), or an empty line to cancel:",
            cell.label, cell.color
        );
        let result = self.write_line(&prompt);
        Self::report(result);
    }

    fn close_picker(&mut self) {}
}

#[cfg(test)]
mod test {
    use super::{Palette, TerminalView};
    use crate::{render::render_grid, view::View};
    use pixelwall_common::{CellId, Color, GridShape, PixelState};
    use pretty_assertions::assert_eq;

    fn drawn(palette: Palette, state: &PixelState) -> String {
        let grid = GridShape::new(2).unwrap();
        let mut view = TerminalView::new(Vec::new(), palette, &Color::default());
        view.replace_grid(grid, &render_grid(grid, state, &Color::default()));
        view.set_loading(false);

        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn truecolor_backgrounds() {
        let state = serde_json::from_str(r##"{"0":"#ff0000","3":"chartreuse"}"##).unwrap();
        let out = drawn(Palette::TrueColor, &state);

        assert!(out.contains("\x1b[48;2;255;0;0m"));
        // unparseable colors fall back to the wall background
        assert_eq!(out.matches("\x1b[48;2;26;26;46m").count(), 3);
    }

    #[test]
    fn plain_marks_painted_cells() {
        let state = serde_json::from_str(r##"{"1":"#ffffff"}"##).unwrap();
        let out = drawn(Palette::Plain, &state);

        assert_eq!(out, "\n     0 1\n  0 ..##\n  1 ....\n");
    }

    #[test]
    fn plain_compares_colors_not_spelling() {
        let state = serde_json::from_str(r##"{"0":"#1A1A2E","1":"#1a1a2e","2":"not-a-color","3":"#abc"}"##).unwrap();
        let out = drawn(Palette::Plain, &state);

        assert_eq!(out, "\n     0 1\n  0 ....\n  1 ..##\n");
    }

    #[test]
    fn hidden_while_loading() {
        let grid = GridShape::new(2).unwrap();
        let mut view = TerminalView::new(Vec::new(), Palette::Plain, &Color::default());
        view.set_loading_text("Loading pixels...");
        view.replace_grid(grid, &render_grid(grid, &PixelState::new(), &Color::default()));

        assert_eq!(String::from_utf8(view.into_inner()).unwrap(), "Loading pixels...\n");
    }

    #[test]
    fn picker_prompt_names_the_cell() {
        let mut view = TerminalView::new(Vec::new(), Palette::Plain, &Color::default());
        let cell = crate::render::CellView::new(CellId(7), Color::new("#00ff00"));
        view.open_picker(&cell);

        let out = String::from_utf8(view.into_inner()).unwrap();
        assert!(out.starts_with("Pixel 7, color #00ff00. Enter a color (current #00ff00)"));
    }
}
