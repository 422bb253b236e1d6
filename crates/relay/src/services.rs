//! The shop's service menu.

/// A bookable service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub name: &'static str,
    /// Price in thousands of đồng.
    pub price_k: u32,
}

impl Service {
    /// Label stored in the booking row (e.g. `Combo VIP - 350K`).
    pub fn label(&self) -> String {
        format!("{} - {}K", self.name, self.price_k)
    }

    /// Full price text (e.g. `350.000đ`).
    pub fn price(&self) -> String {
        format!("{}.000đ", self.price_k)
    }
}

/// Services in menu order; menu numbers are 1-based.
pub const SERVICES: [Service; 6] = [
    Service { name: "Cắt Tóc Nam", price_k: 100 },
    Service { name: "Cạo Râu & Tạo Kiểu", price_k: 70 },
    Service { name: "Nhuộm Tóc", price_k: 200 },
    Service { name: "Gội Đầu & Massage", price_k: 80 },
    Service { name: "Uốn / Duỗi", price_k: 250 },
    Service { name: "Combo VIP", price_k: 350 },
];

/// Look up a service by its menu number.
pub fn by_menu_number(input: &str) -> Option<&'static Service> {
    let number: usize = input.trim().parse().ok()?;
    number.checked_sub(1).and_then(|index| SERVICES.get(index))
}

/// Map free text to a service label.
///
/// Accepts a menu number or a service name (case-insensitive, optionally
/// followed by a price). Unrecognised text is returned trimmed.
pub fn resolve_label(input: &str) -> String {
    let input = input.trim();
    if let Some(service) = by_menu_number(input) {
        return service.label();
    }
    let lower = input.to_lowercase();
    SERVICES
        .iter()
        .find(|s| lower.starts_with(&s.name.to_lowercase()))
        .map(Service::label)
        .unwrap_or_else(|| input.to_string())
}

/// Numbered menu with short prices, one service per line.
pub fn menu_lines() -> String {
    SERVICES
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Price list shown for menu keywords.
pub fn price_list() -> String {
    let lines = SERVICES
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {} — {}", i + 1, s.name, s.price()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "💈 BẢNG GIÁ DỊCH VỤ\n━━━━━━━━━━━━━━━\n\n{}\n\nGõ 'đặt lịch' để bắt đầu đặt lịch!",
        lines
    )
}
