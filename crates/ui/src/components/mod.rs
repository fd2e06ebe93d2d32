mod ar_button;

pub use ar_button::ArButtonView;
