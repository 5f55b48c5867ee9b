use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureHandle, TextureOptions};
use image::imageops;
use image::{Rgba, RgbaImage};

use crate::brush::BrushType;
use crate::canvas::{FillRequest, RasterCanvas};
use crate::geometry::{PixelRect, Point};
use crate::io;
use crate::settings::CanvasSettings;

/// What a press on the canvas does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ToolMode {
    Draw,
    Fill,
}

pub struct DoodleApp {
    canvas: RasterCanvas,
    brush_type: BrushType,
    color: Color32,
    width: f32,
    mode: ToolMode,
    texture: Option<TextureHandle>,
    /// Last message shown in the status bar.
    status: String,
}

impl DoodleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: CanvasSettings) -> Self {
        let canvas = RasterCanvas::with_settings(settings.canvas_width, settings.canvas_height, &settings);
        Self {
            canvas,
            brush_type: BrushType::Normal,
            color: Color32::BLACK,
            width: settings.default_brush_width,
            mode: ToolMode::Draw,
            texture: None,
            status: String::new(),
        }
    }

    fn brush_color(&self) -> Rgba<u8> {
        Rgba(self.color.to_srgba_unmultiplied())
    }

    // --- Toolbar ---

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.mode, ToolMode::Draw, "✏ Draw");
            ui.selectable_value(&mut self.mode, ToolMode::Fill, "🪣 Fill");
            ui.separator();

            egui::ComboBox::from_id_source("brush_type")
                .selected_text(self.brush_type.label())
                .show_ui(ui, |ui| {
                    for brush in BrushType::all() {
                        ui.selectable_value(&mut self.brush_type, *brush, brush.label());
                    }
                });
            ui.color_edit_button_srgba(&mut self.color);
            ui.add(egui::Slider::new(&mut self.width, 1.0..=64.0).text("Width"));
            ui.separator();

            let idle = !self.canvas.is_stroking();
            if ui.add_enabled(idle && self.canvas.can_undo(), egui::Button::new("Undo")).clicked() {
                self.canvas.undo();
            }
            if ui.add_enabled(idle && self.canvas.can_redo(), egui::Button::new("Redo")).clicked() {
                self.canvas.redo();
            }
            if ui.add_enabled(idle, egui::Button::new("Clear")).clicked() {
                self.canvas.clear();
            }
            ui.separator();

            if ui.button("Import page…").clicked() {
                self.import_background();
            }
            if ui.add_enabled(self.canvas.background().is_some(), egui::Button::new("Remove page")).clicked() {
                self.canvas.clear_background_image();
            }
            if ui.button("Export PNG…").clicked() {
                self.export_png();
            }
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("{}×{}", self.canvas.width(), self.canvas.height()));
            ui.separator();
            ui.label(format!("Undo steps: {}", self.canvas.undo_depth()));
            if self.canvas.is_filling() {
                ui.separator();
                ui.spinner();
                ui.label("Filling…");
            }
            if !self.status.is_empty() {
                ui.separator();
                ui.label(&self.status);
            }
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            let z = i.key_pressed(egui::Key::Z);
            (cmd && z && !i.modifiers.shift, cmd && (i.key_pressed(egui::Key::Y) || (z && i.modifiers.shift)))
        });
        if undo {
            self.canvas.undo();
        } else if redo {
            self.canvas.redo();
        }
    }

    // --- Files ---

    fn import_background(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "bmp", "webp"])
            .pick_file()
        else {
            return;
        };
        match io::import_background(&path, self.canvas.width(), self.canvas.height()) {
            Ok(page) => {
                self.canvas.set_background_image(page);
                self.status = format!("Loaded {}", path.display());
            }
            Err(e) => {
                log::error!("{e}");
                self.status = e.to_string();
            }
        }
    }

    fn export_png(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("doodle.png")
            .save_file()
        else {
            return;
        };
        match io::save_png(&self.canvas.export_composite(), &path) {
            Ok(()) => self.status = format!("Saved {}", path.display()),
            Err(e) => {
                log::error!("export failed: {e}");
                self.status = e.to_string();
            }
        }
    }

    // --- Canvas ---

    fn canvas_view(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (w, h) = (available.x.floor().max(1.0) as u32, available.y.floor().max(1.0) as u32);
        if !self.canvas.is_stroking() && (w, h) != (self.canvas.width(), self.canvas.height()) {
            self.canvas.resize(w, h);
        }

        let size = egui::vec2(self.canvas.width() as f32, self.canvas.height() as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let origin = response.rect.min;
        let to_canvas = |pos: Pos2| Point::new(pos.x - origin.x, pos.y - origin.y);

        match self.mode {
            ToolMode::Draw => {
                if response.drag_started() {
                    // The drag is reported once the pointer has moved; start at the press point
                    let start = ui.input(|i| i.pointer.press_origin()).or(response.interact_pointer_pos());
                    if let Some(pos) = start {
                        self.canvas.set_brush(self.brush_type, self.brush_color(), self.width);
                        self.canvas.begin_stroke(to_canvas(pos));
                    }
                }
                if response.dragged()
                    && self.canvas.is_stroking()
                    && let Some(pos) = response.interact_pointer_pos()
                {
                    self.canvas.continue_stroke(to_canvas(pos));
                }
                if response.drag_released() {
                    self.canvas.end_stroke();
                }
            }
            ToolMode::Fill => {
                if response.clicked()
                    && let Some(pos) = response.interact_pointer_pos()
                {
                    let status = self.canvas.fill(to_canvas(pos), self.brush_color());
                    self.status = match status {
                        FillRequest::Started | FillRequest::Queued => String::new(),
                        FillRequest::Busy => "Still filling, try again".to_string(),
                        FillRequest::NoBackground => "Import a page to fill".to_string(),
                        FillRequest::OutOfBounds => "Tap inside the page".to_string(),
                        FillRequest::AlreadyFilled => "Already that colour".to_string(),
                    };
                }
            }
        }

        self.sync_texture(ui.ctx());
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            painter.image(texture.id(), response.rect, uv, Color32::WHITE);
        }
    }

    /// Re-upload the changed part of the composite.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let dirty = self.canvas.take_redraw();
        if dirty.is_none() && self.texture.is_some() {
            return;
        }
        let composite = self.canvas.export_composite();
        let full_size = [composite.width() as usize, composite.height() as usize];
        let full_rect = PixelRect::full(composite.width(), composite.height());

        if let Some(texture) = self.texture.as_mut()
            && texture.size() == full_size
            && let Some(rect) = dirty
            && rect != full_rect
        {
            let region = imageops::crop_imm(&composite, rect.min_x, rect.min_y, rect.width(), rect.height()).to_image();
            texture.set_partial([rect.min_x as usize, rect.min_y as usize], color_image(&region), TextureOptions::NEAREST);
            return;
        }

        let image = color_image(&composite);
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => self.texture = Some(ctx.load_texture("doodle_canvas", image, TextureOptions::NEAREST)),
        }
    }
}

fn color_image(image: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied([image.width() as usize, image.height() as usize], image.as_raw())
}

impl eframe::App for DoodleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.canvas.poll_fill();
        if self.canvas.is_filling() {
            ctx.request_repaint();
        }
        if !self.canvas.is_stroking() {
            self.handle_shortcuts(ctx);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.status_bar(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame { fill: Color32::from_gray(64), ..Default::default() })
            .show(ctx, |ui| self.canvas_view(ui));
    }
}
