//! Encoder and decoder seams plus the configuration passed through them.

use crate::{BsonDocumentReader, BsonValue, Result, UuidRepresentation};

/// Reads a `T` from the reader's current position.
pub trait Decoder<T> {
    fn decode(&self, reader: &mut BsonDocumentReader<'_>, context: &DecoderContext) -> Result<T>;
}

/// Turns a `T` into a BSON value.
pub trait Encoder<T> {
    fn encode(&self, value: &T, context: &EncoderContext) -> Result<BsonValue>;
}

macro_rules! define_context {
    ($(#[$meta:meta])* $name:ident, $builder:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub struct $name {
            uuid_representation: UuidRepresentation,
        }

        impl $name {
            #[inline]
            pub fn builder() -> $builder {
                $builder::default()
            }

            #[inline]
            pub fn uuid_representation(&self) -> UuidRepresentation {
                self.uuid_representation
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::builder().build()
            }
        }

        #[derive(Clone, Copy, Debug)]
        pub struct $builder {
            uuid_representation: UuidRepresentation,
        }

        impl Default for $builder {
            /// Starts from [`UuidRepresentation::JavaLegacy`], the layout
            /// existing data was written with.
            #[inline]
            fn default() -> Self {
                Self {
                    uuid_representation: UuidRepresentation::JavaLegacy,
                }
            }
        }

        impl $builder {
            #[inline]
            pub fn uuid_representation(mut self, representation: UuidRepresentation) -> Self {
                self.uuid_representation = representation;
                self
            }

            #[inline]
            pub fn build(self) -> $name {
                $name {
                    uuid_representation: self.uuid_representation,
                }
            }
        }
    };
}

define_context!(
    /// Settings for decoding.
    ///
    /// ```
    /// use na_bson::{DecoderContext, UuidRepresentation};
    ///
    /// let context = DecoderContext::builder()
    ///     .uuid_representation(UuidRepresentation::Standard)
    ///     .build();
    /// assert_eq!(context.uuid_representation(), UuidRepresentation::Standard);
    /// assert_eq!(
    ///     DecoderContext::default().uuid_representation(),
    ///     UuidRepresentation::JavaLegacy
    /// );
    /// ```
    DecoderContext,
    DecoderContextBuilder
);

define_context!(
    /// Settings for encoding, chosen independently of [`DecoderContext`].
    EncoderContext,
    EncoderContextBuilder
);
