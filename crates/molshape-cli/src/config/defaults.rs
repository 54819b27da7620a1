use molshape::engine::config::{DEFAULT_BASE_URL, DEFAULT_CANVAS_SIZE, DEFAULT_PROPERTY};

pub struct DefaultsConfig {
    pub base_url: String,
    pub property: String,
    pub render_enabled: bool,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub workers: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            property: DEFAULT_PROPERTY.to_string(),
            render_enabled: true,
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            workers: 1,
        }
    }
}
