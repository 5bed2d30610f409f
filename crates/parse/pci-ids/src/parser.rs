//! Single-pass line parser for `pci.ids`.

use crate::{IdDatabase, ParseError, RecordError};

/// Width of the hexadecimal ID field.
const ID_LEN: usize = 4;
/// Separator between the ID and the name.
const SEPARATOR: &str = "  ";
/// Prefix of the device-class section that follows the vendor list.
const CLASS_SECTION: &str = "C ";

/// Classification of one source line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// Blank or comment.
    Skip,
    /// Start of the class section; nothing after it is loaded.
    ClassSection,
    /// Vendor record (no indent).
    Vendor(&'a str),
    /// Device record (one tab).
    Device(&'a str),
    /// Subsystem record (two tabs).
    Subsystem,
}

fn classify(line: &str) -> Line<'_> {
    if line.is_empty() || line.starts_with('#') {
        Line::Skip
    } else if line.starts_with("\t\t") {
        Line::Subsystem
    } else if let Some(rest) = line.strip_prefix('\t') {
        Line::Device(rest)
    } else if line.starts_with(CLASS_SECTION) {
        Line::ClassSection
    } else {
        Line::Vendor(line)
    }
}

/// Splits `XXXX  Name` into the numeric ID and the name.
fn split_record(record: &str) -> Result<(u16, &str), RecordError> {
    let id = record.get(..ID_LEN).ok_or(RecordError::Truncated)?;
    if !id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RecordError::InvalidId);
    }
    let id = u16::from_str_radix(id, 16).map_err(|_| RecordError::InvalidId)?;

    let rest = &record[ID_LEN..];
    if rest.is_empty() {
        return Err(RecordError::Truncated);
    }
    let name = rest
        .strip_prefix(SEPARATOR)
        .ok_or(RecordError::MissingSeparator)?;
    if name.is_empty() {
        return Err(RecordError::Truncated);
    }
    Ok((id, name))
}

pub(crate) fn parse(source: &str) -> Result<IdDatabase, ParseError> {
    let mut db = IdDatabase::default();
    let mut current_vendor = None;

    for (index, line) in source.lines().enumerate() {
        let at = |kind: RecordError| ParseError {
            line: index + 1,
            kind,
        };

        match classify(line) {
            Line::Skip | Line::Subsystem => {}
            Line::ClassSection => break,
            Line::Vendor(record) => {
                let (vendor_id, name) = split_record(record).map_err(at)?;
                db.insert_vendor(vendor_id, name);
                current_vendor = Some(vendor_id);
            }
            Line::Device(record) => {
                let vendor_id = current_vendor.ok_or(at(RecordError::DeviceWithoutVendor))?;
                let (device_id, name) = split_record(record).map_err(at)?;
                db.insert_device(vendor_id, device_id, name);
            }
        }
    }

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NOT_AVAILABLE;

    const SAMPLE: &str = "1111  Acme Corp\n\t2222  Widget\n\t3333  Gadget\n2222  Foo Inc\n";

    #[test]
    fn resolves_vendors_and_devices() {
        let db = IdDatabase::parse(SAMPLE).unwrap();
        assert_eq!(db.vendor_name(0x1111), "Acme Corp");
        assert_eq!(db.device_name(0x1111, 0x2222), "Widget");
        assert_eq!(db.device_name(0x1111, 0x3333), "Gadget");
        assert_eq!(db.vendor_name(0x2222), "Foo Inc");
        assert_eq!(db.vendor_count(), 2);
        assert_eq!(db.device_count(), 2);
    }

    #[test]
    fn misses_resolve_to_placeholder() {
        let db = IdDatabase::parse(SAMPLE).unwrap();
        assert_eq!(db.device_name(0x2222, 0x9999), NOT_AVAILABLE);
        assert_eq!(db.vendor_name(0x9999), NOT_AVAILABLE);
        assert_eq!(db.device_name(0x9999, 0x2222), NOT_AVAILABLE);
        assert!(!db.contains_vendor(0x9999));
    }

    #[test]
    fn comments_and_blanks_keep_vendor_association() {
        let source = "\
# List of PCI ID's
#
8086  Intel Corporation
\t1237  440FX - 82441FX PMC [Natoma]

# The 82371SB is a multi-function part
\t7000  82371SB PIIX3 ISA [Natoma/Triton II]
";
        let db = IdDatabase::parse(source).unwrap();
        assert_eq!(db.device_name(0x8086, 0x1237), "440FX - 82441FX PMC [Natoma]");
        assert_eq!(
            db.device_name(0x8086, 0x7000),
            "82371SB PIIX3 ISA [Natoma/Triton II]"
        );
    }

    #[test]
    fn subsystem_lines_are_ignored() {
        let source = "\
1af4  Red Hat, Inc.
\t1000  Virtio network device
\t\t1af4 0001  Virtio network device
\t1001  Virtio block device
";
        let db = IdDatabase::parse(source).unwrap();
        assert_eq!(db.device_count(), 2);
        assert_eq!(db.device_name(0x1af4, 0x1001), "Virtio block device");
    }

    #[test]
    fn class_section_ends_vendor_list() {
        let source = "\
ffff  Illegal Vendor ID
# List of known device classes, subclasses and programming interfaces
C 00  Unclassified device
\t00  Non-VGA unclassified device
C 01  Mass storage controller
\t01  IDE interface
\t\t00  ISA Compatibility mode-only controller
";
        let db = IdDatabase::parse(source).unwrap();
        assert_eq!(db.vendor_count(), 1);
        assert_eq!(db.device_count(), 0);
        assert_eq!(db.vendor_name(0xffff), "Illegal Vendor ID");
    }

    #[test]
    fn accepts_crlf_and_uppercase_hex() {
        let db = IdDatabase::parse("10DE  NVIDIA Corporation\r\n\t1B80  GP104\r\n").unwrap();
        assert_eq!(db.vendor_name(0x10de), "NVIDIA Corporation");
        assert_eq!(db.device_name(0x10de, 0x1b80), "GP104");
    }

    #[test]
    fn names_keep_inner_spacing() {
        let db = IdDatabase::parse("1234  Name  with   gaps\n").unwrap();
        assert_eq!(db.vendor_name(0x1234), "Name  with   gaps");
    }

    #[test]
    fn later_duplicate_wins() {
        let db = IdDatabase::parse("1234  Old\n1234  New\n").unwrap();
        assert_eq!(db.vendor_name(0x1234), "New");
    }

    #[test]
    fn rejects_non_hex_id() {
        let err = IdDatabase::parse("1111  Acme\n\tzz22  Widget\n").unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 2,
                kind: RecordError::InvalidId
            }
        );
    }

    #[test]
    fn rejects_signed_id() {
        // `from_str_radix` alone would accept a leading '+'.
        let err = IdDatabase::parse("+fff  Plus\n").unwrap_err();
        assert_eq!(err.kind, RecordError::InvalidId);
    }

    #[test]
    fn rejects_single_space_separator() {
        let err = IdDatabase::parse("1111 Acme\n").unwrap_err();
        assert_eq!(err.kind, RecordError::MissingSeparator);
    }

    #[test]
    fn rejects_truncated_records() {
        assert_eq!(
            IdDatabase::parse("11\n").unwrap_err().kind,
            RecordError::Truncated
        );
        assert_eq!(
            IdDatabase::parse("1111\n").unwrap_err().kind,
            RecordError::Truncated
        );
        assert_eq!(
            IdDatabase::parse("1111  \n").unwrap_err().kind,
            RecordError::Truncated
        );
    }

    #[test]
    fn rejects_orphan_device() {
        let err = IdDatabase::parse("# header\n\t2222  Widget\n").unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 2,
                kind: RecordError::DeviceWithoutVendor
            }
        );
    }

    #[test]
    fn error_display_names_line() {
        use alloc::string::ToString;

        let err = IdDatabase::parse("1111  Acme\nxyz1  Bad\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: ID is not a 4-digit hexadecimal number"
        );
    }

    #[test]
    fn empty_source_is_empty_database() {
        let db = IdDatabase::parse("").unwrap();
        assert_eq!(db, IdDatabase::default());
    }
}
