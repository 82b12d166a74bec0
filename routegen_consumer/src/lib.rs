//! A crate consuming a routegen client the way an application would: the
//! module is generated by build.rs and included here.

include!(concat!(env!("OUT_DIR"), "/client.rs"));
