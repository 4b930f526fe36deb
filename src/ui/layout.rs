use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: prompt + feedback sidebar, progress bar
    Medium, // 60-99 cols: full-width prompt, feedback below, progress bar
    Narrow, // <60 cols: prompt only, stats in header
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_progress_bar(&self, height: u16) -> bool {
        height >= 16 && *self != LayoutTier::Narrow
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }

    pub fn show_inline_feedback(&self, height: u16) -> bool {
        *self == LayoutTier::Medium && height >= 20
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        if tier.show_sidebar() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(vertical[1]);

            Self {
                header: vertical[0],
                main: horizontal[0],
                sidebar: Some(horizontal[1]),
                footer: vertical[2],
                tier,
            }
        } else {
            Self {
                header: vertical[0],
                main: vertical[1],
                sidebar: None,
                footer: vertical[2],
                tier,
            }
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 56;
    const MIN_POPUP_HEIGHT: u16 = 16;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_by_width() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 120, 40)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 80, 40)), LayoutTier::Medium);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 40, 40)), LayoutTier::Narrow);
    }

    #[test]
    fn test_wide_layout_has_sidebar() {
        let layout = AppLayout::new(Rect::new(0, 0, 120, 40));
        let sidebar = layout.sidebar.unwrap();
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.footer.height, 1);
        assert_eq!(layout.main.width + sidebar.width, 120);

        let narrow = AppLayout::new(Rect::new(0, 0, 50, 30));
        assert!(narrow.sidebar.is_none());
        assert_eq!(narrow.main.width, 50);
    }

    #[test]
    fn test_centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 200, 60);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, Rect::new(50, 15, 100, 30));

        let small = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(50, 50, small);
        assert_eq!(rect, small);
    }
}
