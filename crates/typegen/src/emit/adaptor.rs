// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Middleware (ROS serialization) adaptor.
//!
//! The adaptor is the same algorithm for every type: the value travels as a
//! JSON text envelope, followed by a part count and the raw bytes of each
//! binary side-channel part. A part count above one on the read side means
//! the blobs must be re-attached before decoding. The serialized length is
//! obtained from a counting pass over the same JSON writer.

use tera::{Context, Tera};

const ADAPTOR_TEMPLATE: &str = r#"#include <ros/ros.h>
namespace ros {
namespace serialization {
template<> struct Serializer<{{ type_name }}> {
template<typename Stream> inline static void write(Stream &stream, {{ type_name }} const &t) {
jsonstr json;
json.useBlobs();
toJson(json, t);
stream.next(json.it);
size_t partCount = json.blobs->partCount();
stream.next((uint32_t)partCount);
for (size_t i=1; i < partCount; i++) {
auto part = json.blobs->getPart(i);
stream.next((uint32_t)part.second);
memcpy(stream.advance((uint32_t)part.second), (void *)part.first, part.second);
}
}
template<typename Stream> inline static void read(Stream &stream, {{ type_name }} &t) {
jsonstr json;
stream.next(json.it);
uint32_t partCount = 0;
stream.next(partCount);
if (partCount > 1) json.useBlobs();
for (size_t i=1; i < partCount; i++) {
uint32_t partSize = 0;
stream.next(partSize);
json.blobs->addExternalPart(stream.advance(partSize), partSize);
}
if (!fromJson(json, t)) throw new runtime_error("deserializing {{ type_name }}: fromJson failed");
}
inline static uint32_t serializedLength({{ type_name }} const &t) {
size_t size = 0;
wrJsonSize(size, nullptr, t);
return (uint32_t)size;
}
};
}
}
"#;

/// Render the adaptor for `type_name`.
pub fn render_adaptor(type_name: &str) -> Result<String, tera::Error> {
    let mut ctx = Context::new();
    ctx.insert("type_name", type_name);
    Tera::one_off(ADAPTOR_TEMPLATE, &ctx, false)
}
