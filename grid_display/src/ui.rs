// ui.rs - egui front end: draws live cells, turns clicks and controls into commands

use std::time::Duration;

use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};
use tracing::warn;

use crate::runner::{Command, SimHandle};

pub struct GridDisplay {
    sim: SimHandle,
    rows: usize,
    cols: usize,
    cell_size: f32,
    interval_text: String,
    input_error: Option<String>,
    live_color: Color32,
    dead_color: Color32,
}

impl GridDisplay {
    pub fn new(sim: SimHandle, rows: usize, cols: usize, cell_size: f32, interval_ms: i64) -> Self {
        Self {
            sim,
            rows,
            cols,
            cell_size,
            interval_text: interval_ms.to_string(),
            input_error: None,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
        }
    }

    fn interval_changed(&mut self) {
        match parse_interval(&self.interval_text) {
            Ok(ms) => {
                self.input_error = None;
                self.sim.send(Command::SetInterval(ms));
            }
            Err(e) => {
                warn!(input = %self.interval_text, "ignoring interval input");
                self.input_error = Some(e);
            }
        }
    }
}

/// Grid cell under a pointer offset (pixels from the board's top-left corner).
/// Negative offsets are outside the board; the upper bound is left to the core.
pub fn cell_at(offset: Vec2, cell_size: f32) -> Option<(usize, usize)> {
    if offset.x < 0.0 || offset.y < 0.0 || cell_size <= 0.0 {
        return None;
    }
    let x = (offset.x / cell_size).floor() as usize;
    let y = (offset.y / cell_size).floor() as usize;
    Some((x, y))
}

/// Interval text box contents as whole milliseconds. Sign is checked by the core.
pub fn parse_interval(text: &str) -> Result<i64, String> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not a whole number of milliseconds", text.trim()))
}

impl eframe::App for GridDisplay {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame = self.sim.frame();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");

            // Controls
            ui.horizontal(|ui| {
                ui.label("Update every");
                let input = ui.add(egui::TextEdit::singleline(&mut self.interval_text).desired_width(60.0));
                if input.changed() {
                    self.interval_changed();
                }
                ui.label("msec");

                ui.separator();

                if frame.running {
                    if ui.button("⏹ Stop").clicked() {
                        self.sim.send(Command::Stop);
                    }
                } else if ui.button("▶ Run").clicked() {
                    self.sim.send(Command::Start);
                }

                if ui.add_enabled(!frame.running, egui::Button::new("Step")).clicked() {
                    self.sim.send(Command::Step);
                }

                if ui.button("Clear").clicked() {
                    self.sim.send(Command::Stop);
                    self.sim.send(Command::Clear);
                }

                ui.separator();
                ui.label(format!("Generation: {}", frame.generation));
            });

            if let Some(error) = self.input_error.as_ref().or(frame.last_error.as_ref()) {
                ui.colored_label(Color32::LIGHT_RED, error.as_str());
            }

            ui.separator();

            // Board
            let board_size = Vec2::new(self.cols as f32, self.rows as f32) * self.cell_size;
            let (response, painter) = ui.allocate_painter(board_size, egui::Sense::click());
            let origin = response.rect.min;

            painter.rect_filled(response.rect, 0.0, self.dead_color);

            for col in 0..=self.cols {
                let x = origin.x + col as f32 * self.cell_size;
                painter.line_segment(
                    [egui::pos2(x, origin.y), egui::pos2(x, origin.y + board_size.y)],
                    Stroke::new(0.5, Color32::from_gray(60)),
                );
            }
            for row in 0..=self.rows {
                let y = origin.y + row as f32 * self.cell_size;
                painter.line_segment(
                    [egui::pos2(origin.x, y), egui::pos2(origin.x + board_size.x, y)],
                    Stroke::new(0.5, Color32::from_gray(60)),
                );
            }

            for cell in &frame.cells {
                let min = origin + Vec2::new(cell.x as f32, cell.y as f32) * self.cell_size;
                let rect = Rect::from_min_size(min, Vec2::splat(self.cell_size)).shrink(1.0);
                painter.rect_filled(rect, 1.0, self.live_color);
            }

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    if let Some((x, y)) = cell_at(pos - origin, self.cell_size) {
                        self.sim.send(Command::Toggle { x, y });
                    }
                }
            }

            ui.separator();

            let total = self.rows * self.cols;
            ui.horizontal(|ui| {
                ui.label(format!("Live cells: {}", frame.cells.len()));
                ui.label(format!("Population: {:.1}%", frame.cells.len() as f32 / total as f32 * 100.0));
                ui.label(format!("Interval: {} ms", frame.interval_ms));
            });
        });

        // Keep pulling frames from the simulation thread while it runs
        if frame.running {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
