use crate::models::{Panel, PanelState};

/// Visibility of the settings and chart panels. Each changes only through its
/// own open/close actions.
#[derive(Clone, Copy, Debug)]
pub struct Panels {
    settings: PanelState,
    chart: PanelState,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            settings: PanelState::Hidden,
            chart: PanelState::Hidden,
        }
    }
}

impl Panels {
    pub fn open(&mut self, panel: Panel) {
        *self.slot(panel) = PanelState::Visible;
    }

    pub fn close(&mut self, panel: Panel) {
        *self.slot(panel) = PanelState::Hidden;
    }

    pub fn state(&self, panel: Panel) -> PanelState {
        match panel {
            Panel::Settings => self.settings,
            Panel::Chart => self.chart,
        }
    }

    fn slot(&mut self, panel: Panel) -> &mut PanelState {
        match panel {
            Panel::Settings => &mut self.settings,
            Panel::Chart => &mut self.chart,
        }
    }
}
