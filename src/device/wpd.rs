//! Windows Portable Devices namespace
//!
//! Phones attached over USB appear under "This PC" through the WPD API rather
//! than as drive letters. This module browses that tree via COM: the device
//! manager lists the devices, and each device is opened on first use and kept
//! open for the rest of the run.

use crate::core::error::{ListerError, Result};
use crate::device::namespace::{ItemFilter, Namespace};
use log::{debug, info, trace, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ptr::null_mut;
use windows::{
    core::{GUID, PCWSTR, PWSTR},
    Win32::{
        Devices::PortableDevices::{
            IEnumPortableDeviceObjectIDs, IPortableDevice, IPortableDeviceContent,
            IPortableDeviceKeyCollection, IPortableDeviceManager, IPortableDeviceProperties,
            IPortableDeviceValues, PortableDeviceFTM, PortableDeviceKeyCollection,
            PortableDeviceManager, PortableDeviceValues, WPD_CLIENT_MAJOR_VERSION,
            WPD_CLIENT_MINOR_VERSION, WPD_CLIENT_NAME, WPD_CLIENT_REVISION,
            WPD_CLIENT_SECURITY_QUALITY_OF_SERVICE, WPD_OBJECT_CONTENT_TYPE, WPD_OBJECT_NAME,
            WPD_OBJECT_ORIGINAL_FILE_NAME,
        },
        System::Com::{
            CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, CLSCTX_INPROC_SERVER,
            COINIT_MULTITHREADED,
        },
        UI::Shell::PropertiesSystem::PROPERTYKEY,
    },
};

/// Object ID of a device's root object
const DEVICE_ROOT_ID: &str = "DEVICE";

/// Root of the shell's addressable names for portable devices
const COMPUTER_ADDRESS: &str = "This PC";

/// Client name announced when opening a device
const CLIENT_NAME: &str = "list-photos-on-phone";

/// GUID for folder content type
const WPD_CONTENT_TYPE_FOLDER: GUID = GUID::from_u128(0x27e2e392_a111_48e0_ab0c_e17705a05f85);

/// GUID for functional object content type (storages such as "Internal Storage")
const WPD_CONTENT_TYPE_FUNCTIONAL_OBJECT: GUID =
    GUID::from_u128(0x99ed0160_17ff_4c44_9d98_1d7a6f941921);

/// Objects fetched per enumerator call
const ENUM_BATCH_SIZE: usize = 100;

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// String from a buffer filled by the API, where `length` counts the
/// terminating NUL. `None` when nothing but the terminator was written.
fn decode_wide(buffer: &[u16], length: u32) -> Option<String> {
    let chars = (length as usize).saturating_sub(1).min(buffer.len());
    if chars == 0 {
        return None;
    }
    Some(String::from_utf16_lossy(&buffer[..chars]))
}

/// A bound node of the WPD tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WpdNode {
    /// PnP ID of the device the node lives on
    device_id: String,
    /// Object ID on the device (`DEVICE` for the device itself)
    object_id: String,
    /// Display name, `None` when the device did not report one
    name: Option<String>,
    /// Addressable name of the parent
    parent_address: String,
}

impl WpdNode {
    fn name(&self) -> Result<&str> {
        self.name
            .as_deref()
            .ok_or_else(|| ListerError::probe(&self.device_id, "device has no friendly name"))
    }
}

/// Manager for device enumeration and connection
struct DeviceManager {
    manager: IPortableDeviceManager,
}

impl DeviceManager {
    /// Create a new DeviceManager (COM must already be initialized)
    fn new() -> Result<Self> {
        unsafe {
            let manager: IPortableDeviceManager =
                CoCreateInstance(&PortableDeviceManager, None, CLSCTX_INPROC_SERVER).map_err(
                    |e| ListerError::Enumeration(format!("Failed to create device manager: {}", e)),
                )?;

            Ok(Self { manager })
        }
    }

    /// PnP IDs of all connected portable devices
    fn device_ids(&self) -> Result<Vec<String>> {
        unsafe {
            let _ = self.manager.RefreshDeviceList();

            let mut device_count: u32 = 0;
            self.manager
                .GetDevices(null_mut(), &mut device_count)
                .map_err(|e| {
                    ListerError::Enumeration(format!("Failed to get device count: {}", e))
                })?;

            if device_count == 0 {
                return Ok(Vec::new());
            }

            let mut device_ids: Vec<PWSTR> = vec![PWSTR::null(); device_count as usize];
            self.manager
                .GetDevices(device_ids.as_mut_ptr(), &mut device_count)
                .map_err(|e| {
                    ListerError::Enumeration(format!("Failed to enumerate devices: {}", e))
                })?;

            let mut ids = Vec::with_capacity(device_count as usize);
            for device_id_ptr in device_ids.iter().take(device_count as usize) {
                if device_id_ptr.is_null() {
                    continue;
                }
                ids.push(device_id_ptr.to_string().unwrap_or_default());
                CoTaskMemFree(Some(device_id_ptr.0 as *const _));
            }

            Ok(ids)
        }
    }

    /// Friendly name as shown under "This PC"
    fn friendly_name(&self, device_id: &str) -> Result<String> {
        unsafe {
            let device_id_wide = to_wide(device_id);

            let mut length: u32 = 0;
            let _ = self.manager.GetDeviceFriendlyName(
                PCWSTR(device_id_wide.as_ptr()),
                PWSTR::null(),
                &mut length,
            );

            if length == 0 {
                return Err(ListerError::probe(device_id, "friendly name not found"));
            }

            let mut buffer: Vec<u16> = vec![0; length as usize];
            self.manager
                .GetDeviceFriendlyName(
                    PCWSTR(device_id_wide.as_ptr()),
                    PWSTR(buffer.as_mut_ptr()),
                    &mut length,
                )
                .map_err(|e| ListerError::probe(device_id, e))?;

            decode_wide(&buffer, length)
                .ok_or_else(|| ListerError::probe(device_id, "friendly name is empty"))
        }
    }

    /// Open a connection to a device
    fn open_device(&self, device_id: &str) -> Result<PortableDevice> {
        unsafe {
            let device: IPortableDevice =
                CoCreateInstance(&PortableDeviceFTM, None, CLSCTX_INPROC_SERVER)
                    .map_err(|e| ListerError::probe(device_id, e))?;

            let client_info: IPortableDeviceValues =
                CoCreateInstance(&PortableDeviceValues, None, CLSCTX_INPROC_SERVER)
                    .map_err(|e| ListerError::probe(device_id, e))?;

            let client_name = to_wide(CLIENT_NAME);
            client_info.SetStringValue(&WPD_CLIENT_NAME, PCWSTR(client_name.as_ptr()))?;
            client_info.SetUnsignedIntegerValue(&WPD_CLIENT_MAJOR_VERSION, 1)?;
            client_info.SetUnsignedIntegerValue(&WPD_CLIENT_MINOR_VERSION, 0)?;
            client_info.SetUnsignedIntegerValue(&WPD_CLIENT_REVISION, 0)?;
            client_info
                .SetUnsignedIntegerValue(&WPD_CLIENT_SECURITY_QUALITY_OF_SERVICE, 0x00020000)?;

            let device_id_wide = to_wide(device_id);
            device
                .Open(PCWSTR(device_id_wide.as_ptr()), &client_info)
                .map_err(|e| ListerError::probe(device_id, format!("failed to open: {}", e)))?;

            let content = device
                .Content()
                .map_err(|e| ListerError::probe(device_id, e))?;

            debug!("Opened device: {}", device_id);
            Ok(PortableDevice { content, device })
        }
    }
}

/// An open device connection
struct PortableDevice {
    content: IPortableDeviceContent,
    device: IPortableDevice,
}

impl PortableDevice {
    /// Enumerate children of an object as (object ID, name, is folder)
    fn enumerate_children(&self, parent_id: &str) -> Result<Vec<(String, String, bool)>> {
        trace!("Enumerating children of: {}", parent_id);

        unsafe {
            let parent_id_wide = to_wide(parent_id);

            let enum_objects: IEnumPortableDeviceObjectIDs = self
                .content
                .EnumObjects(0, PCWSTR(parent_id_wide.as_ptr()), None)
                .map_err(|e| ListerError::probe(parent_id, e))?;

            let properties: IPortableDeviceProperties = self.content.Properties()?;

            let keys_to_read: IPortableDeviceKeyCollection =
                CoCreateInstance(&PortableDeviceKeyCollection, None, CLSCTX_INPROC_SERVER)?;
            keys_to_read.Add(&WPD_OBJECT_NAME)?;
            keys_to_read.Add(&WPD_OBJECT_ORIGINAL_FILE_NAME)?;
            keys_to_read.Add(&WPD_OBJECT_CONTENT_TYPE)?;

            let mut objects = Vec::new();

            loop {
                let mut object_ids: [PWSTR; ENUM_BATCH_SIZE] = [PWSTR::null(); ENUM_BATCH_SIZE];
                let mut fetched: u32 = 0;

                let result = enum_objects.Next(&mut object_ids[..], &mut fetched as *mut u32);

                if fetched == 0 {
                    break;
                }

                for object_id_ptr in object_ids.iter().take(fetched as usize) {
                    if object_id_ptr.is_null() {
                        continue;
                    }

                    let object_id = object_id_ptr.to_string().unwrap_or_default();
                    CoTaskMemFree(Some(object_id_ptr.0 as *const _));

                    let object_id_wide = to_wide(&object_id);
                    match properties.GetValues(PCWSTR(object_id_wide.as_ptr()), &keys_to_read) {
                        Ok(values) => {
                            let (name, is_folder) = parse_object_properties(&values);
                            trace!("  -> '{}' (folder: {})", name, is_folder);
                            objects.push((object_id, name, is_folder));
                        }
                        Err(e) => {
                            warn!("Failed to get properties for object '{}': {}", object_id, e);
                        }
                    }
                }

                if result.is_err() {
                    break;
                }
            }

            if objects.is_empty() && parent_id == DEVICE_ROOT_ID {
                info!("No objects at the device root; the phone may be locked or not trusted");
            }

            Ok(objects)
        }
    }
}

impl Drop for PortableDevice {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.Close();
        }
    }
}

/// Name and folder flag from an object's properties.
///
/// Storages are functional objects rather than folders but are browsed the
/// same way.
fn parse_object_properties(values: &IPortableDeviceValues) -> (String, bool) {
    unsafe {
        let name = get_string_value(values, &WPD_OBJECT_ORIGINAL_FILE_NAME)
            .or_else(|_| get_string_value(values, &WPD_OBJECT_NAME))
            .unwrap_or_default();

        let is_folder = match values.GetGuidValue(&WPD_OBJECT_CONTENT_TYPE) {
            Ok(content_type) => {
                content_type == WPD_CONTENT_TYPE_FOLDER
                    || content_type == WPD_CONTENT_TYPE_FUNCTIONAL_OBJECT
            }
            Err(_) => false,
        };

        (name, is_folder)
    }
}

fn get_string_value(values: &IPortableDeviceValues, key: &PROPERTYKEY) -> Result<String> {
    unsafe {
        let pwstr = values.GetStringValue(key)?;
        let result = pwstr.to_string().unwrap_or_default();
        CoTaskMemFree(Some(pwstr.0 as *const _));
        Ok(result)
    }
}

/// RAII guard for COM initialization
struct ComGuard;

impl ComGuard {
    fn new() -> Result<Self> {
        unsafe {
            CoInitializeEx(None, COINIT_MULTITHREADED).ok()?;
        }
        Ok(Self)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe {
            CoUninitialize();
        }
    }
}

/// The portable devices attached to this PC
pub struct WpdNamespace {
    opened: RefCell<HashMap<String, PortableDevice>>,
    manager: DeviceManager,
    // Dropped last: every COM object above must be released first
    _com: ComGuard,
}

impl WpdNamespace {
    /// Initialize COM and connect to the device manager
    pub fn new() -> Result<Self> {
        let com = ComGuard::new()?;
        let manager = DeviceManager::new()?;
        Ok(Self {
            opened: RefCell::new(HashMap::new()),
            manager,
            _com: com,
        })
    }

    fn with_device<T>(
        &self,
        device_id: &str,
        f: impl FnOnce(&PortableDevice) -> Result<T>,
    ) -> Result<T> {
        let mut opened = self.opened.borrow_mut();
        if !opened.contains_key(device_id) {
            let device = self.manager.open_device(device_id)?;
            opened.insert(device_id.to_string(), device);
        }
        match opened.get(device_id) {
            Some(device) => f(device),
            None => Err(ListerError::probe(device_id, "device not open")),
        }
    }
}

impl Namespace for WpdNamespace {
    type Node = WpdNode;

    fn devices(&self) -> Result<Vec<WpdNode>> {
        let ids = self.manager.device_ids()?;
        debug!("{} portable device(s) attached", ids.len());

        Ok(ids
            .into_iter()
            .map(|device_id| {
                let name = match self.manager.friendly_name(&device_id) {
                    Ok(name) => Some(name),
                    Err(e) => {
                        debug!("{}", e);
                        None
                    }
                };
                WpdNode {
                    device_id,
                    object_id: DEVICE_ROOT_ID.to_string(),
                    name,
                    parent_address: COMPUTER_ADDRESS.to_string(),
                }
            })
            .collect())
    }

    fn children(&self, node: &WpdNode, filter: ItemFilter) -> Result<Vec<WpdNode>> {
        let address = self.addressable_name(node)?;
        let objects = self.with_device(&node.device_id, |device| {
            device.enumerate_children(&node.object_id)
        })?;

        Ok(objects
            .into_iter()
            .filter(|(_, _, is_folder)| filter.accepts(*is_folder))
            .map(|(object_id, name, _)| WpdNode {
                device_id: node.device_id.clone(),
                object_id,
                name: Some(name),
                parent_address: address.clone(),
            })
            .collect())
    }

    fn display_name(&self, node: &WpdNode) -> Result<String> {
        node.name().map(str::to_string)
    }

    fn addressable_name(&self, node: &WpdNode) -> Result<String> {
        Ok(format!("{}\\{}", node.parent_address, node.name()?))
    }
}
