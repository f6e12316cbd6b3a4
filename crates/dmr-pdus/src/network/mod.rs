pub mod dmrd;
