//! Declarative field layouts driving the generic body codec.
//!
//! Each transaction type declares its wire format as an ordered table of
//! [`FieldSpec`]s instead of hand-written per-type parsing. The walk is
//! the same for every type: fixed fields, count fields, element runs,
//! and at most one trailing `Remaining` field whose length is inferred
//! from the transaction's declared total size.

use crate::encoding::{CodecError, Decoder, Encoder};

/// How a single body field occupies the wire.
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// Exactly `width` bytes, always present.
    Fixed { width: usize },
    /// Little-endian element count for the named `elements` field.
    ///
    /// Derived from the element data on encode; never stored in the
    /// typed body.
    Count {
        width: usize,
        elements: &'static str,
    },
    /// `count * element_width` bytes, the count given by a preceding
    /// `Count` field naming this one.
    Elements { element_width: usize },
    /// Every byte left of the declared total size; must be last.
    Remaining,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn fixed(name: &'static str, width: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Fixed { width },
        }
    }

    pub const fn count(name: &'static str, width: usize, elements: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Count { width, elements },
        }
    }

    pub const fn elements(name: &'static str, element_width: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Elements { element_width },
        }
    }

    pub const fn remaining(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Remaining,
        }
    }
}

/// Ordered wire layout of one transaction body.
#[derive(Clone, Copy, Debug)]
pub struct BodyLayout {
    pub fields: &'static [FieldSpec],
}

/// Raw field data keyed by layout field name.
///
/// Count fields are implicit: they are derived from element data on
/// encode and dropped after decode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyFields {
    entries: Vec<(&'static str, Vec<u8>)>,
}

impl BodyFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, data: Vec<u8>) {
        self.entries.push((name, data));
    }

    pub fn get(&self, name: &'static str) -> Result<&[u8], CodecError> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, data)| data.as_slice())
            .ok_or(CodecError::InvalidField {
                field: name,
                reason: "missing field data",
            })
    }
}

impl BodyLayout {
    fn element_width_of(&self, name: &'static str) -> Option<usize> {
        self.fields.iter().find_map(|spec| match spec.kind {
            FieldKind::Elements { element_width } if spec.name == name => Some(element_width),
            _ => None,
        })
    }

    /// Reads the body fields in declared order.
    ///
    /// `body_size` is the transaction's declared total size minus its
    /// preamble; a `Remaining` field consumes whatever the other fields
    /// leave of it. The walk must account for `body_size` exactly.
    pub fn decode(
        &self,
        decoder: &mut Decoder<'_>,
        body_size: usize,
    ) -> Result<BodyFields, CodecError> {
        let start = decoder.position();
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        let mut out = BodyFields::new();

        for spec in self.fields {
            match spec.kind {
                FieldKind::Fixed { width } => {
                    out.push(spec.name, decoder.read_bytes(width, spec.name)?);
                }
                FieldKind::Count { width, elements } => {
                    let value = decoder.read_uint_le(width, spec.name)?;
                    let count = usize::try_from(value).map_err(|_| CodecError::InvalidField {
                        field: spec.name,
                        reason: "count exceeds addressable size",
                    })?;
                    counts.push((elements, count));
                }
                FieldKind::Elements { element_width } => {
                    let count = counts
                        .iter()
                        .find(|(name, _)| *name == spec.name)
                        .map(|(_, count)| *count)
                        .ok_or(CodecError::InvalidField {
                            field: spec.name,
                            reason: "no preceding count field",
                        })?;
                    let total =
                        count
                            .checked_mul(element_width)
                            .ok_or(CodecError::InvalidField {
                                field: spec.name,
                                reason: "count exceeds addressable size",
                            })?;
                    out.push(spec.name, decoder.read_bytes(total, spec.name)?);
                }
                FieldKind::Remaining => {
                    let consumed = decoder.position() - start;
                    let len =
                        body_size
                            .checked_sub(consumed)
                            .ok_or(CodecError::InvalidField {
                                field: spec.name,
                                reason: "negative remaining length",
                            })?;
                    out.push(spec.name, decoder.read_bytes(len, spec.name)?);
                }
            }
        }

        if decoder.position() - start != body_size {
            return Err(CodecError::InvalidField {
                field: "size",
                reason: "declared size does not match field layout",
            });
        }
        Ok(out)
    }

    /// Writes the body fields in declared order, deriving count values.
    pub fn encode(&self, fields: &BodyFields, encoder: &mut Encoder) -> Result<(), CodecError> {
        for spec in self.fields {
            match spec.kind {
                FieldKind::Fixed { width } => {
                    let data = fields.get(spec.name)?;
                    if data.len() != width {
                        return Err(CodecError::InvalidField {
                            field: spec.name,
                            reason: "width mismatch",
                        });
                    }
                    encoder.write_bytes(data);
                }
                FieldKind::Count { width, elements } => {
                    let count = self.element_count(fields, elements)?;
                    encoder.write_uint_le(count as u64, width, spec.name)?;
                }
                FieldKind::Elements { element_width } => {
                    let data = fields.get(spec.name)?;
                    if element_width == 0 || data.len() % element_width != 0 {
                        return Err(CodecError::InvalidField {
                            field: spec.name,
                            reason: "data is not a whole number of elements",
                        });
                    }
                    encoder.write_bytes(data);
                }
                FieldKind::Remaining => {
                    encoder.write_bytes(fields.get(spec.name)?);
                }
            }
        }
        Ok(())
    }

    /// Computes the encoded body size without writing anything.
    pub fn measure(&self, fields: &BodyFields) -> Result<usize, CodecError> {
        let mut size = 0usize;
        for spec in self.fields {
            size += match spec.kind {
                FieldKind::Fixed { width } => {
                    let data = fields.get(spec.name)?;
                    if data.len() != width {
                        return Err(CodecError::InvalidField {
                            field: spec.name,
                            reason: "width mismatch",
                        });
                    }
                    width
                }
                FieldKind::Count { width, elements } => {
                    self.element_count(fields, elements)?;
                    width
                }
                FieldKind::Elements { .. } | FieldKind::Remaining => fields.get(spec.name)?.len(),
            };
        }
        Ok(size)
    }

    fn element_count(&self, fields: &BodyFields, elements: &'static str) -> Result<usize, CodecError> {
        let element_width = self
            .element_width_of(elements)
            .ok_or(CodecError::InvalidField {
                field: elements,
                reason: "no matching elements field",
            })?;
        let data = fields.get(elements)?;
        if element_width == 0 || data.len() % element_width != 0 {
            return Err(CodecError::InvalidField {
                field: elements,
                reason: "data is not a whole number of elements",
            });
        }
        Ok(data.len() / element_width)
    }
}

/// Converts raw field data to a fixed-width array.
pub(crate) fn to_array<const N: usize>(
    data: &[u8],
    field: &'static str,
) -> Result<[u8; N], CodecError> {
    data.try_into().map_err(|_| CodecError::InvalidField {
        field,
        reason: "width mismatch",
    })
}

pub(crate) fn u32_le(data: &[u8], field: &'static str) -> Result<u32, CodecError> {
    Ok(u32::from_le_bytes(to_array::<4>(data, field)?))
}

pub(crate) fn u64_le(data: &[u8], field: &'static str) -> Result<u64, CodecError> {
    Ok(u64::from_le_bytes(to_array::<8>(data, field)?))
}
