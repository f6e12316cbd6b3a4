pub mod mmdvm_frame;
