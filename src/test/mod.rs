mod exchange;
mod handshake;
mod pipeline;
mod sim_time;
mod simulator;
mod step_driver;
mod view;
