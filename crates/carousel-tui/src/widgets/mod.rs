mod carousel;
mod dots;
mod status_bar;

pub use carousel::CarouselWidget;
pub use dots::DotsWidget;
pub use status_bar::StatusBarWidget;
