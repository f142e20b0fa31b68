use serde::de;

use crate::{
    field::{DateTimeFieldType, DurationFieldType},
    tz::{DateTimeZone, ZoneContext},
};

/// Time zones serialize as their identifier.
impl serde::Serialize for DateTimeZone {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Time zones deserialize by looking up their identifier in
/// [`ZoneContext::global`].
impl<'de> serde::Deserialize<'de> for DateTimeZone {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTimeZone, D::Error> {
        struct ZoneVisitor;

        impl<'de> de::Visitor<'de> for ZoneVisitor {
            type Value = DateTimeZone;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("a time zone identifier")
            }

            #[inline]
            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<DateTimeZone, E> {
                ZoneContext::global().for_id(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(ZoneVisitor)
    }
}

macro_rules! serde_by_name {
    ($ty:ident, $visitor:ident, $expecting:literal) => {
        impl serde::Serialize for $ty {
            #[inline]
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<$ty, D::Error> {
                struct $visitor;

                impl<'de> de::Visitor<'de> for $visitor {
                    type Value = $ty;

                    fn expecting(
                        &self,
                        f: &mut core::fmt::Formatter,
                    ) -> core::fmt::Result {
                        f.write_str($expecting)
                    }

                    #[inline]
                    fn visit_str<E: de::Error>(
                        self,
                        value: &str,
                    ) -> Result<$ty, E> {
                        $ty::from_name(value).ok_or_else(|| {
                            E::invalid_value(de::Unexpected::Str(value), &self)
                        })
                    }
                }

                deserializer.deserialize_str($visitor)
            }
        }
    };
}

serde_by_name!(DurationFieldType, DurationTypeVisitor, "a duration field name");
serde_by_name!(DateTimeFieldType, DateTimeTypeVisitor, "a date-time field name");
