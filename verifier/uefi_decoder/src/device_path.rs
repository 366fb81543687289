/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

//! EFI device path text rendering
//!
//! A device path is a list of nodes `{type: u8, subtype: u8, length: u16, payload}`
//! ending with the End Entire node. Nodes are rendered in the usual UEFI text
//! form (`PciRoot(0x0)/Pci(0x2,0x0)/HD(1,GPT,...)/File(\EFI\BOOT\BOOTX64.EFI)`),
//! path instances are separated by `,`. Nodes without a dedicated rendering
//! fall back to `Path(type,subtype,hexpayload)`.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::byte_reader::{decode_utf16_until_nul, ByteReader};
use crate::error::DecodeError;

const NODE_HEADER_SIZE: usize = 4;

const HARDWARE_DEVICE_PATH: u8 = 0x01;
const ACPI_DEVICE_PATH: u8 = 0x02;
const MESSAGING_DEVICE_PATH: u8 = 0x03;
const MEDIA_DEVICE_PATH: u8 = 0x04;
const BBS_DEVICE_PATH: u8 = 0x05;
const END_DEVICE_PATH: u8 = 0x7f;

const END_INSTANCE: u8 = 0x01;
const END_ENTIRE: u8 = 0xff;

/// Compressed EISA vendor id of "PNP"
const PNP_EISA_VENDOR: u32 = 0x41d0;

const VENDOR_PC_ANSI: &str = "e0c14753-f9be-11d2-9a0c-0090273fc14d";
const VENDOR_VT_100: &str = "dfa66065-b419-11d3-9a2d-0090273fc14d";
const VENDOR_VT_100_PLUS: &str = "7baec70b-57e0-4c76-8e87-2f9e28088343";
const VENDOR_UTF8: &str = "ad15a0d6-8bec-4acf-a073-d01de77e2d88";

/// One node of a device path
struct DevicePathNode<'a> {
    node_type: u8,
    sub_type: u8,
    payload: &'a [u8],
}

impl<'a> DevicePathNode<'a> {
    fn read(reader: &mut ByteReader<'a>) -> Result<Self, DecodeError> {
        let node_type = reader.read_u8()?;
        let sub_type = reader.read_u8()?;
        let length = reader.read_u16()? as usize;
        if length < NODE_HEADER_SIZE {
            return Err(DecodeError::malformed(
                "device path",
                format!("node {:#x}/{:#x} has length {}", node_type, sub_type, length),
            ));
        }
        let payload = reader.read_slice(length - NODE_HEADER_SIZE)?;
        Ok(Self { node_type, sub_type, payload })
    }

    fn to_text(&self) -> Result<String, DecodeError> {
        let mut reader = ByteReader::new(self.payload);
        let text = match self.node_type {
            HARDWARE_DEVICE_PATH => hardware_node(self.sub_type, &mut reader)?,
            ACPI_DEVICE_PATH => acpi_node(self.sub_type, &mut reader)?,
            MESSAGING_DEVICE_PATH => messaging_node(self.sub_type, &mut reader)?,
            MEDIA_DEVICE_PATH => media_node(self.sub_type, &mut reader)?,
            BBS_DEVICE_PATH => bbs_node(self.sub_type, &mut reader)?,
            _ => None,
        };
        Ok(text.unwrap_or_else(|| self.generic_text()))
    }

    fn generic_text(&self) -> String {
        format!("Path({},{},{})", self.node_type, self.sub_type, hex::encode(self.payload))
    }
}

/// Render a binary device path as text
///
/// # Errors
/// * `Malformed` when a node is shorter than its header or the end node is missing
/// * `Truncated` when a node runs past the buffer or its payload is too short for its kind
pub fn format_device_path(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut reader = ByteReader::new(bytes);
    let mut text = String::new();
    let mut instance_start = true;
    loop {
        if reader.is_end() {
            return Err(DecodeError::malformed("device path", "missing end of path node"));
        }
        let node = DevicePathNode::read(&mut reader)?;
        if node.node_type == END_DEVICE_PATH {
            match node.sub_type {
                END_ENTIRE => return Ok(text),
                END_INSTANCE => {
                    text.push(',');
                    instance_start = true;
                    continue;
                }
                _ => {}
            }
        }
        if !instance_start {
            text.push('/');
        }
        text.push_str(&node.to_text()?);
        instance_start = false;
    }
}

fn vendor_text(prefix: &str, reader: &mut ByteReader<'_>) -> Result<String, DecodeError> {
    let guid = reader.read_guid()?;
    let data = reader.read_rest();
    if data.is_empty() {
        Ok(format!("{}({})", prefix, guid))
    } else {
        Ok(format!("{}({},{})", prefix, guid, hex::encode(data)))
    }
}

fn hardware_node(sub_type: u8, reader: &mut ByteReader<'_>) -> Result<Option<String>, DecodeError> {
    let text = match sub_type {
        0x01 => {
            let function = reader.read_u8()?;
            let device = reader.read_u8()?;
            format!("Pci({:#x},{:#x})", device, function)
        }
        0x02 => format!("PcCard({:#x})", reader.read_u8()?),
        0x03 => {
            let memory_type = reader.read_u32()?;
            let start = reader.read_u64()?;
            let end = reader.read_u64()?;
            format!("MemoryMapped({},{:#x},{:#x})", memory_type, start, end)
        }
        0x04 => vendor_text("VenHw", reader)?,
        0x05 => format!("Ctrl({:#x})", reader.read_u32()?),
        0x06 => {
            let interface_type = reader.read_u8()?;
            let base_address = reader.read_u64()?;
            format!("BMC({},{:#x})", interface_type, base_address)
        }
        _ => return Ok(None),
    };
    Ok(Some(text))
}

/// Render an EISA id such as `PNP0A03`
fn eisa_id(id: u32) -> String {
    let letter = |bits: u32| char::from(b'@' + (bits & 0x1f) as u8);
    format!("{}{}{}{:04X}", letter(id >> 10), letter(id >> 5), letter(id), id >> 16)
}

fn acpi_node(sub_type: u8, reader: &mut ByteReader<'_>) -> Result<Option<String>, DecodeError> {
    let text = match sub_type {
        0x01 => {
            let hid = reader.read_u32()?;
            let uid = reader.read_u32()?;
            if hid & 0xffff == PNP_EISA_VENDOR {
                match hid >> 16 {
                    0x0a03 => format!("PciRoot({:#x})", uid),
                    0x0a08 => format!("PcieRoot({:#x})", uid),
                    0x0604 => format!("Floppy({:#x})", uid),
                    0x0301 => format!("Keyboard({:#x})", uid),
                    0x0501 => format!("Serial({:#x})", uid),
                    0x0401 => format!("ParallelPort({:#x})", uid),
                    _ => format!("Acpi({},{:#x})", eisa_id(hid), uid),
                }
            } else {
                format!("Acpi({:#x},{:#x})", hid, uid)
            }
        }
        0x02 => {
            let hid = reader.read_u32()?;
            let uid = reader.read_u32()?;
            let cid = reader.read_u32()?;
            let hid_str = reader.read_ascii_nul_terminated()?;
            let uid_str = reader.read_ascii_nul_terminated()?;
            let cid_str = reader.read_ascii_nul_terminated()?;
            let pick = |text: String, id: u32| if text.is_empty() { eisa_id(id) } else { text };
            let uid_text = if uid_str.is_empty() { format!("{:#x}", uid) } else { uid_str };
            format!("AcpiEx({},{},{})", pick(hid_str, hid), pick(cid_str, cid), uid_text)
        }
        0x03 => {
            let mut addresses = vec![format!("{:#x}", reader.read_u32()?)];
            while reader.remaining() >= 4 {
                addresses.push(format!("{:#x}", reader.read_u32()?));
            }
            format!("AcpiAdr({})", addresses.join(","))
        }
        _ => return Ok(None),
    };
    Ok(Some(text))
}

fn ip_protocol(protocol: u16) -> String {
    match protocol {
        6 => "TCP".to_string(),
        17 => "UDP".to_string(),
        other => format!("{:#x}", other),
    }
}

fn read_ipv4(reader: &mut ByteReader<'_>) -> Result<Ipv4Addr, DecodeError> {
    let octets = reader.read_slice(4)?;
    Ok(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))
}

fn read_ipv6(reader: &mut ByteReader<'_>) -> Result<Ipv6Addr, DecodeError> {
    let mut octets = [0u8; 16];
    octets.copy_from_slice(reader.read_slice(16)?);
    Ok(Ipv6Addr::from(octets))
}

fn messaging_node(sub_type: u8, reader: &mut ByteReader<'_>) -> Result<Option<String>, DecodeError> {
    let text = match sub_type {
        0x01 => {
            let channel = if reader.read_u8()? == 0 { "Primary" } else { "Secondary" };
            let drive = if reader.read_u8()? == 0 { "Master" } else { "Slave" };
            let lun = reader.read_u16()?;
            format!("Ata({},{},{:#x})", channel, drive, lun)
        }
        0x02 => {
            let target = reader.read_u16()?;
            let lun = reader.read_u16()?;
            format!("Scsi({:#x},{:#x})", target, lun)
        }
        0x03 => {
            reader.skip(4)?;
            let wwn = reader.read_u64()?;
            let lun = reader.read_u64()?;
            format!("Fibre({:#x},{:#x})", wwn, lun)
        }
        0x04 => {
            reader.skip(4)?;
            format!("I1394({:#x})", reader.read_u64()?)
        }
        0x05 => {
            let port = reader.read_u8()?;
            let interface = reader.read_u8()?;
            format!("USB({:#x},{:#x})", port, interface)
        }
        0x06 => format!("I2O({:#x})", reader.read_u32()?),
        0x0a => {
            let guid = reader.read_guid()?;
            match guid.as_str() {
                VENDOR_PC_ANSI => "VenPcAnsi()".to_string(),
                VENDOR_VT_100 => "VenVt100()".to_string(),
                VENDOR_VT_100_PLUS => "VenVt100Plus()".to_string(),
                VENDOR_UTF8 => "VenUtf8()".to_string(),
                _ => {
                    let data = reader.read_rest();
                    if data.is_empty() {
                        format!("VenMsg({})", guid)
                    } else {
                        format!("VenMsg({},{})", guid, hex::encode(data))
                    }
                }
            }
        }
        0x0b => {
            let address = reader.read_slice(32)?;
            let interface_type = reader.read_u8()?;
            // Ethernet and 802.3 addresses are six bytes long
            let used = if interface_type <= 1 { &address[..6] } else { address };
            format!("MAC({},{:#x})", hex::encode(used), interface_type)
        }
        0x0c => {
            let local = read_ipv4(reader)?;
            let remote = read_ipv4(reader)?;
            reader.skip(4)?;
            let protocol = reader.read_u16()?;
            let origin = if reader.read_u8()? == 0 { "DHCP" } else { "Static" };
            format!("IPv4({},{},{},{})", remote, ip_protocol(protocol), origin, local)
        }
        0x0d => {
            let local = read_ipv6(reader)?;
            let remote = read_ipv6(reader)?;
            reader.skip(4)?;
            let protocol = reader.read_u16()?;
            let origin = match reader.read_u8()? {
                0 => "Static".to_string(),
                1 => "StatelessAutoConfigure".to_string(),
                2 => "StatefulAutoConfigure".to_string(),
                other => format!("{:#x}", other),
            };
            format!("IPv6({},{},{},{})", remote, ip_protocol(protocol), origin, local)
        }
        0x0e => {
            reader.skip(4)?;
            let baud_rate = reader.read_u64()?;
            let data_bits = reader.read_u8()?;
            let parity = match reader.read_u8()? {
                0 => "D",
                1 => "N",
                2 => "E",
                3 => "O",
                4 => "M",
                5 => "S",
                _ => "x",
            };
            let stop_bits = match reader.read_u8()? {
                0 => "D",
                1 => "1",
                2 => "1.5",
                3 => "2",
                _ => "x",
            };
            format!("Uart({},{},{},{})", baud_rate, data_bits, parity, stop_bits)
        }
        0x0f => {
            let vendor_id = reader.read_u16()?;
            let product_id = reader.read_u16()?;
            let class = reader.read_u8()?;
            let subclass = reader.read_u8()?;
            let protocol = reader.read_u8()?;
            format!(
                "UsbClass({:#x},{:#x},{:#x},{:#x},{:#x})",
                vendor_id, product_id, class, subclass, protocol
            )
        }
        0x10 => {
            let interface = reader.read_u16()?;
            let vendor_id = reader.read_u16()?;
            let product_id = reader.read_u16()?;
            let serial = decode_utf16_until_nul(reader.read_rest());
            format!("UsbWwid({:#x},{:#x},{:#x},\"{}\")", vendor_id, product_id, interface, serial)
        }
        0x11 => format!("Unit({:#x})", reader.read_u8()?),
        0x12 => {
            let hba_port = reader.read_u16()?;
            let multiplier_port = reader.read_u16()?;
            let lun = reader.read_u16()?;
            format!("Sata({:#x},{:#x},{:#x})", hba_port, multiplier_port, lun)
        }
        0x13 => {
            let protocol = reader.read_u16()?;
            let options = reader.read_u16()?;
            let lun = reader.read_slice(8)?;
            let portal_group = reader.read_u16()?;
            let name = reader.read_ascii_nul_terminated()?;
            let protocol = if protocol == 0 { "TCP".to_string() } else { format!("{:#x}", protocol) };
            format!(
                "iSCSI({},{:#x},0x{},{:#x},{})",
                name,
                portal_group,
                hex::encode(lun),
                options,
                protocol
            )
        }
        0x14 => format!("Vlan({})", reader.read_u16()?),
        0x15 => {
            reader.skip(4)?;
            let wwn = reader.read_slice(8)?;
            let lun = reader.read_slice(8)?;
            format!("FibreEx(0x{},0x{})", hex::encode(wwn), hex::encode(lun))
        }
        0x17 => {
            let namespace_id = reader.read_u32()?;
            let eui = reader.read_slice(8)?;
            let eui_text: Vec<String> = eui.iter().map(|b| format!("{:02x}", b)).collect();
            format!("NVMe({:#x},{})", namespace_id, eui_text.join("-"))
        }
        0x18 => format!("Uri({})", String::from_utf8_lossy(reader.read_rest())),
        0x19 => {
            let target = reader.read_u8()?;
            let lun = reader.read_u8()?;
            format!("UFS({:#x},{:#x})", target, lun)
        }
        0x1a => format!("SD({})", reader.read_u8()?),
        0x1d => format!("eMMC({})", reader.read_u8()?),
        _ => return Ok(None),
    };
    Ok(Some(text))
}

fn media_node(sub_type: u8, reader: &mut ByteReader<'_>) -> Result<Option<String>, DecodeError> {
    let text = match sub_type {
        0x01 => {
            let partition_number = reader.read_u32()?;
            let start = reader.read_u64()?;
            let size = reader.read_u64()?;
            let signature = reader.read_slice(16)?;
            let format = reader.read_u8()?;
            let signature_type = reader.read_u8()?;
            let signature_text = match signature_type {
                0x01 => format!("{:#010x}", u32::from_le_bytes([signature[0], signature[1], signature[2], signature[3]])),
                0x02 => ByteReader::new(signature).read_guid()?,
                _ => "0".to_string(),
            };
            let format_text = match format {
                0x01 => "MBR".to_string(),
                0x02 => "GPT".to_string(),
                other => other.to_string(),
            };
            format!(
                "HD({},{},{},{:#x},{:#x})",
                partition_number, format_text, signature_text, start, size
            )
        }
        0x02 => {
            let boot_entry = reader.read_u32()?;
            let start = reader.read_u64()?;
            let size = reader.read_u64()?;
            format!("CDROM({:#x},{:#x},{:#x})", boot_entry, start, size)
        }
        0x03 => vendor_text("VenMedia", reader)?,
        0x04 => format!("File({})", decode_utf16_until_nul(reader.read_rest())),
        0x05 => format!("Media({})", reader.read_guid()?),
        0x06 => format!("FvFile({})", reader.read_guid()?),
        0x07 => format!("Fv({})", reader.read_guid()?),
        0x08 => {
            reader.skip(4)?;
            let start = reader.read_u64()?;
            let end = reader.read_u64()?;
            format!("Offset({:#x},{:#x})", start, end)
        }
        0x09 => {
            let start = reader.read_u64()?;
            let end = reader.read_u64()?;
            let disk_type = reader.read_guid()?;
            let instance = reader.read_u16()?;
            format!("RamDisk({:#x},{:#x},{},{})", start, end, instance, disk_type)
        }
        _ => return Ok(None),
    };
    Ok(Some(text))
}

fn bbs_node(sub_type: u8, reader: &mut ByteReader<'_>) -> Result<Option<String>, DecodeError> {
    if sub_type != 0x01 {
        return Ok(None);
    }
    let device_type = reader.read_u16()?;
    let status = reader.read_u16()?;
    let description = reader.read_ascii_nul_terminated()?;
    Ok(Some(format!("BBS({:#x},\"{}\",{:#x})", device_type, description, status)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eisa_id() {
        assert_eq!(eisa_id(0x0a0341d0), "PNP0A03");
        assert_eq!(eisa_id(0x0c0a41d0), "PNP0C0A");
    }
}
