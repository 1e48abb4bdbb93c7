//! Image type registry: BFB image_id ↔ name.
//!
//! The table is a contract with the firmware build that produces the
//! container; ids and names must match it exactly. Order follows the boot
//! stream layout (ATF images, then UEFI boot assets).

/// One known image type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageType {
    pub id: u8,
    pub name: &'static str,
}

impl ImageType {
    const fn new(id: u8, name: &'static str) -> Self {
        Self { id, name }
    }
}

/// All image types known to the unpacker.
pub const IMAGE_TYPES: &[ImageType] = &[
    // ATF
    ImageType::new(36, "psc-bl"),
    ImageType::new(37, "psc-fw"),
    ImageType::new(31, "bl2r-cert"),
    ImageType::new(30, "bl2r"),
    ImageType::new(6, "bl2-cert"),
    ImageType::new(1, "bl2"),
    ImageType::new(29, "sys"),
    ImageType::new(38, "ddr-cert"),
    ImageType::new(32, "ddr_ini"),
    ImageType::new(33, "snps_images"),
    ImageType::new(34, "ddr_ate_imem"),
    ImageType::new(35, "ddr_ate_dmem"),
    ImageType::new(8, "bl30-key-cert"),
    ImageType::new(12, "bl30-cert"),
    ImageType::new(2, "bl30"),
    ImageType::new(7, "trusted-key-cert"),
    ImageType::new(9, "bl31-key-cert"),
    ImageType::new(13, "bl31-cert"),
    ImageType::new(3, "bl31"),
    ImageType::new(10, "bl32-key-cert"),
    ImageType::new(14, "bl32-cert"),
    ImageType::new(4, "bl32"),
    ImageType::new(11, "bl33-key-cert"),
    ImageType::new(15, "bl33-cert"),
    ImageType::new(5, "bl33"),
    ImageType::new(52, "capsule"),
    // UEFI
    ImageType::new(55, "boot-acpi"),
    ImageType::new(56, "boot-dtb"),
    ImageType::new(57, "boot-desc"),
    ImageType::new(58, "boot-path"),
    ImageType::new(59, "boot-args"),
    ImageType::new(60, "boot-timeout"),
    ImageType::new(61, "uefi-tests"),
    ImageType::new(54, "ramdisk"),
    ImageType::new(62, "image"),
    ImageType::new(63, "initramfs"),
];

/// Look up the registry entry for an image id. First match wins.
#[must_use]
pub fn image_type(image_id: u32) -> Option<&'static ImageType> {
    IMAGE_TYPES.iter().find(|t| u32::from(t.id) == image_id)
}

/// Resolve an image id to its name; `None` if the id is not registered.
#[must_use]
pub fn image_name(image_id: u32) -> Option<&'static str> {
    image_type(image_id).map(|t| t.name)
}

/// Reverse lookup: name → image id.
#[must_use]
pub fn image_id(name: &str) -> Option<u8> {
    IMAGE_TYPES.iter().find(|t| t.name == name).map(|t| t.id)
}
