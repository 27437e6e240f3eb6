//! Small drawing helpers shared by the account screens.

use eframe::egui;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(88, 101, 242);

pub fn lighten_color(c: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round().clamp(0.0, 255.0) as u8
    };
    egui::Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}

/// Labelled single-line input with a stable id so focus survives re-layout.
pub fn form_text_field(
    ui: &mut egui::Ui,
    id: &'static str,
    label: &str,
    hint: &str,
    value: &mut String,
    secret: bool,
    should_focus: bool,
) -> egui::Response {
    ui.label(egui::RichText::new(label).strong());
    let edit = egui::TextEdit::singleline(value)
        .id_salt(id)
        .password(secret)
        .hint_text(
            egui::RichText::new(hint).color(ui.visuals().weak_text_color().gamma_multiply(0.85)),
        )
        .desired_width(f32::INFINITY);

    let response = ui.add_sized([ui.available_width(), 34.0], edit);
    if should_focus {
        response.request_focus();
    }
    response
}

pub fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::NONE
        .fill(lighten_color(ui.visuals().panel_fill, 0.04))
        .corner_radius(14.0)
        .stroke(egui::Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
        .inner_margin(egui::Margin::symmetric(20, 18))
}

/// Full-width primary button; disabled while `busy`, with a progress label
/// in its place.
pub fn primary_button(ui: &mut egui::Ui, label: &str, busy: bool, busy_label: &str) -> bool {
    if busy {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new());
            ui.label(egui::RichText::new(busy_label).weak());
        });
    }
    let button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
        .min_size(egui::vec2(ui.available_width(), 40.0))
        .fill(ACCENT);
    ui.add_enabled(!busy, button).clicked()
}

pub fn initials_avatar(ui: &mut egui::Ui, initials: &str, size: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), size / 2.0, ACCENT);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials,
        egui::FontId::proportional(size * 0.38),
        egui::Color32::WHITE,
    );
}

pub fn detail_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(egui::RichText::new(label).weak());
    ui.label(value);
    ui.end_row();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_moves_channels_towards_white() {
        let base = egui::Color32::from_rgb(0, 100, 255);
        assert_eq!(lighten_color(base, 0.0), base);
        assert_eq!(lighten_color(base, 1.0), egui::Color32::from_rgb(255, 255, 255));
        assert_eq!(lighten_color(base, 0.5), egui::Color32::from_rgb(128, 178, 255));
    }
}
