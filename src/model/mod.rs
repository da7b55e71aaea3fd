pub mod patient;
pub mod queues;
