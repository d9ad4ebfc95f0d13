pub mod chat;
pub mod event_bus;
pub mod ports;
pub mod session;

#[cfg(test)]
mod tests;
