pub mod canvas_screen;
pub mod screen;
