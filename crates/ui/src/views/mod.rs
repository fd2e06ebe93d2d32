mod ar_page;
mod capabilities;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use ar_page::{ArPage, ArPageView};
pub use capabilities::CapabilitiesView;
