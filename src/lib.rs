pub mod config;
pub mod dns;
pub mod i18n;
pub mod seq;
pub mod sim;
pub mod view;
pub mod viz;
pub mod widget;

#[cfg(test)]
mod test;
