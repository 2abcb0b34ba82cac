// Bindings for proto/helloworld.proto are checked in so that building the
// crate does not require protoc. Regenerate with tonic-build (client only)
// whenever the proto changes.

pub mod helloworld;
