//! Minimal NumPy `.npy` encoding for the two array layouts the archive uses:
//! `|u1` pixel tensors and `<U{n}` fixed-width unicode strings.

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;

/// Parsed `.npy` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpyHeader {
    pub descr: String,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl NpyHeader {
    pub fn new(descr: impl Into<String>, shape: Vec<usize>) -> Self {
        Self {
            descr: descr.into(),
            fortran_order: false,
            shape,
        }
    }

    /// Number of elements described by the shape.
    /// Total number of elements, or `None` if it does not fit a `usize`.
    pub fn element_count(&self) -> Option<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    /// Encode as a version 1.0 preamble (magic, version, length, dict).
    pub fn encode(&self) -> Vec<u8> {
        let shape = match self.shape.as_slice() {
            [single] => format!("({single},)"),
            dims => format!(
                "({})",
                dims.iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        let mut dict = format!(
            "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
            self.descr,
            if self.fortran_order { "True" } else { "False" },
            shape
        );

        // magic + version + u16 length, then the dict padded to the alignment
        let preamble = MAGIC.len() + 2 + 2;
        let unpadded = preamble + dict.len() + 1;
        let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
        dict.push_str(&" ".repeat(padding));
        dict.push('\n');

        let mut out = Vec::with_capacity(preamble + dict.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&[1, 0]);
        out.extend_from_slice(&(dict.len() as u16).to_le_bytes());
        out.extend_from_slice(dict.as_bytes());
        out
    }
}

/// Split raw `.npy` bytes into the header and the data that follows it.
pub fn decode(bytes: &[u8]) -> Result<(NpyHeader, &[u8]), String> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err("not a .npy array (bad magic)".to_string());
    }

    let major = bytes[6];
    let (header_len, start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err("truncated .npy preamble".to_string());
            }
            (
                u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
                12,
            )
        }
        other => return Err(format!("unsupported .npy version {other}")),
    };

    let end = start + header_len;
    let dict = bytes
        .get(start..end)
        .ok_or_else(|| "truncated .npy header".to_string())?;
    let dict = std::str::from_utf8(dict).map_err(|_| "header is not valid text".to_string())?;

    Ok((parse_dict(dict)?, &bytes[end..]))
}

fn parse_dict(dict: &str) -> Result<NpyHeader, String> {
    let descr = quoted_value(dict, "descr")?;
    let fortran_order = match raw_value(dict, "fortran_order")? {
        v if v.starts_with("True") => true,
        v if v.starts_with("False") => false,
        v => return Err(format!("bad fortran_order '{v}'")),
    };

    let shape_src = raw_value(dict, "shape")?;
    let shape_src = shape_src
        .strip_prefix('(')
        .and_then(|s| s.split(')').next())
        .ok_or_else(|| "shape is not a tuple".to_string())?;
    let shape = shape_src
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| format!("bad shape entry '{s}'")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NpyHeader {
        descr,
        fortran_order,
        shape,
    })
}

fn raw_value<'a>(dict: &'a str, key: &str) -> Result<&'a str, String> {
    let needle = format!("'{key}':");
    let at = dict
        .find(&needle)
        .ok_or_else(|| format!("header has no '{key}' entry"))?;
    Ok(dict[at + needle.len()..].trim_start())
}

fn quoted_value(dict: &str, key: &str) -> Result<String, String> {
    let raw = raw_value(dict, key)?;
    raw.strip_prefix('\'')
        .and_then(|s| s.split('\'').next())
        .map(str::to_string)
        .ok_or_else(|| format!("'{key}' is not a string"))
}

/// Width in characters of the `<U{n}` dtype needed for `strings`.
pub fn unicode_width(strings: &[String]) -> usize {
    strings
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .max(1)
}

/// Encode `strings` as fixed-width little-endian UTF-32.
pub fn encode_unicode(strings: &[String], width: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(strings.len() * width * 4);
    for s in strings {
        let mut written = 0;
        for ch in s.chars().take(width) {
            out.extend_from_slice(&(ch as u32).to_le_bytes());
            written += 1;
        }
        out.resize(out.len() + (width - written) * 4, 0);
    }
    out
}

/// Decode fixed-width little-endian UTF-32 strings, dropping trailing NULs.
pub fn decode_unicode(data: &[u8], count: usize, width: usize) -> Result<Vec<String>, String> {
    let sizes = width
        .checked_mul(4)
        .and_then(|stride| Some((stride, stride.checked_mul(count)?)));
    let Some((stride, expected)) = sizes else {
        return Err(format!("{count} strings of width {width} are too large to address"));
    };
    if data.len() < expected {
        return Err(format!(
            "expected {} bytes of string data, found {}",
            expected,
            data.len()
        ));
    }
    if stride == 0 {
        return Ok(vec![String::new(); count]);
    }

    data.chunks_exact(stride)
        .take(count)
        .map(|chunk| {
            chunk
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .take_while(|&code| code != 0)
                .map(|code| char::from_u32(code).ok_or_else(|| format!("invalid code point {code}")))
                .collect::<Result<String, _>>()
        })
        .collect()
}
