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

//! The `nextgen2` policy
//!
//! Establishes that an allowed combination of kernel, kernel command line and
//! initrd was booted, that all the PK, KEK, db and MoK keys are allowed ones,
//! and that all the code loaded during boot is allowed.
//!
//! Expected params:
//! * `s_crtm`, `post_code`: allowed digests for PCR 0 `EV_S_CRTM_VERSION` and `EV_POST_CODE`
//! * `pk`, `kek`, `db`: allowed keys, each `{owner: GUID, data: hex}`
//! * `device_drivers`: allowed digests for PCR 2 `EV_EFI_BOOT_SERVICES_DRIVER`
//! * `shim`, `grub`: allowed digests for PCR 4 `EV_EFI_BOOT_SERVICES_APPLICATION`
//! * `moklist`: allowed digests for PCR 14 `EV_IPL`
//! * `runs`: allowed `{kernel: {name, digest}, kernel_cmdline: regex, initrd}`
//!
//! A digest maps a hash algorithm name to a hex hash value.

use structured_data::{Data, Mapping};

use super::params;
use super::Policy;
use crate::error::PolicyError;
use crate::test_engine::{
    DelayToFields, Dispatcher, GoodDigests, IterateTest, Test, UnicodeNameMatch, VariableDispatch, VariableTest,
};

const POLICY_NAME: &str = "nextgen2";

const REQUIRED_PARAMS: [&str; 10] = [
    "s_crtm",
    "post_code",
    "pk",
    "kek",
    "db",
    "device_drivers",
    "shim",
    "grub",
    "runs",
    "moklist",
];

/// EFI_GLOBAL_VARIABLE vendor GUID as it appears in parsed events
const EFI_GLOBAL_VARIABLE: &str = "61dfe48b-ca93-d211-aa0d-00e098032b8c";
/// EFI_IMAGE_SECURITY_DATABASE vendor GUID as it appears in parsed events
const EFI_IMAGE_SECURITY_DATABASE: &str = "cbb219d7-3a3d-9645-a3bc-dad00e67656f";
/// EFI_CERT_X509_GUID
const EFI_CERT_X509: &str = "a5c059a1-94e4-4aa7-87b5-ab155c2bf072";

const KERNEL_CMDLINE: &str = "kernel_cmdline";
const BSA: &str = "bsa";
const IPL9: &str = "ipl9";

#[derive(Debug, Default, Clone, Copy)]
pub struct NextGen2;

impl NextGen2 {
    fn event_key(pcr: i64, event_type: &str) -> Vec<Data> {
        vec![Data::Integer(pcr), Data::from(event_type)]
    }

    /// Final correlation of kernel, command line and initrd across the log
    fn runs_test(runs: &Data) -> Result<DelayToFields, PolicyError> {
        let runs = params::list(runs, "runs")?;
        let mut alternatives = Vec::with_capacity(runs.len());
        for (idx, run) in runs.iter().enumerate() {
            let path = format!("runs[{}]", idx);
            let run = params::dict(run, &path)?;
            let kernel_path = format!("{}.kernel", path);
            let kernel = params::dict(params::field(run, &path, "kernel")?, &kernel_path)?;
            let kernel_name = params::string(
                params::field(kernel, &kernel_path, "name")?,
                &format!("{}.name", kernel_path),
            )?;
            let mut kernel_digest = GoodDigests::new();
            params::add_digest(
                &mut kernel_digest,
                params::field(kernel, &kernel_path, "digest")?,
                &format!("{}.digest", kernel_path),
            )?;
            let cmdline = params::string(
                params::field(run, &path, KERNEL_CMDLINE)?,
                &format!("{}.{}", path, KERNEL_CMDLINE),
            )?;
            let initrd = params::string(params::field(run, &path, "initrd")?, &format!("{}.initrd", path))?;

            alternatives.push(Test::fields(vec![
                (
                    KERNEL_CMDLINE,
                    Test::Tuple(vec![Test::regexp(&format!("kernel_cmdline: {}", cmdline))?]),
                ),
                (BSA, Test::Tuple(vec![Test::digest(kernel_digest, None)])),
                (
                    IPL9,
                    Test::Tuple(vec![Test::string_equal(kernel_name), Test::string_equal(initrd)]),
                ),
            ]));
        }
        Ok(DelayToFields::new(Test::Or(alternatives), [KERNEL_CMDLINE, BSA, IPL9]))
    }

    fn secure_boot_variables(params: &Mapping) -> Result<Test, PolicyError> {
        let mut vd = VariableDispatch::new();
        vd.set(EFI_GLOBAL_VARIABLE, "SecureBoot", Test::field("Enabled", Test::string_equal("Yes")))?;
        for (unicode_name, vendor, param) in [
            ("PK", EFI_GLOBAL_VARIABLE, "pk"),
            ("KEK", EFI_GLOBAL_VARIABLE, "kek"),
            ("db", EFI_IMAGE_SECURITY_DATABASE, "db"),
        ] {
            let keys = params::key_list(params::get(params, param)?, param)?;
            vd.set(vendor, unicode_name, Test::key_subset(EFI_CERT_X509, keys))?;
        }
        vd.set(EFI_IMAGE_SECURITY_DATABASE, "dbx", Test::AcceptAll)?;
        Ok(vd.into_test())
    }
}

impl Policy for NextGen2 {
    fn policy_type(&self) -> &str {
        POLICY_NAME
    }

    fn compile(&self, params: &Data) -> Result<Test, PolicyError> {
        let params = params::as_params(params)?;
        params::require_all(params, &REQUIRED_PARAMS)?;

        let mut dispatcher = Dispatcher::new(["PCRIndex", "EventType"])?;
        dispatcher.set(Self::event_key(0, "EV_NO_ACTION"), Test::AcceptAll)?;
        dispatcher.set(
            Self::event_key(0, "EV_S_CRTM_VERSION"),
            Test::digest(params::digest_list(params::get(params, "s_crtm")?, "s_crtm")?, None),
        )?;
        dispatcher.set(
            Self::event_key(0, "EV_POST_CODE"),
            Test::digest(params::digest_list(params::get(params, "post_code")?, "post_code")?, None),
        )?;
        dispatcher.set(Self::event_key(7, "EV_EFI_VARIABLE_DRIVER_CONFIG"), Self::secure_boot_variables(params)?)?;
        for pcr in 0..8 {
            dispatcher.set(Self::event_key(pcr, "EV_SEPARATOR"), Test::AcceptAll)?;
        }
        dispatcher.set(
            Self::event_key(2, "EV_EFI_BOOT_SERVICES_DRIVER"),
            Test::digest(params::digest_list(params::get(params, "device_drivers")?, "device_drivers")?, None),
        )?;
        dispatcher.set(
            Self::event_key(1, "EV_EFI_VARIABLE_BOOT"),
            Test::Variable(VariableTest::new(
                EFI_GLOBAL_VARIABLE,
                UnicodeNameMatch::pattern("BootOrder|Boot[0-9a-fA-F]+")?,
                Test::AcceptAll,
            )),
        )?;
        dispatcher.set(Self::event_key(7, "EV_EFI_VARIABLE_AUTHORITY"), Test::AcceptAll)?;

        let run = Self::runs_test(params::get(params, "runs")?)?;
        let mut shim_grub = params::digest_list(params::get(params, "shim")?, "shim")?;
        shim_grub.merge(params::digest_list(params::get(params, "grub")?, "grub")?);
        dispatcher.set(
            Self::event_key(4, "EV_EFI_BOOT_SERVICES_APPLICATION"),
            Test::digest(shim_grub, Some(run.get(BSA)?)),
        )?;
        dispatcher.set(
            Self::event_key(14, "EV_IPL"),
            Test::digest(params::digest_list(params::get(params, "moklist")?, "moklist")?, None),
        )?;
        dispatcher.set(
            Self::event_key(8, "EV_IPL"),
            Test::field(
                "Event",
                Test::field(
                    "String",
                    Test::Or(vec![
                        Test::regexp_dotall("grub_cmd: .*")?,
                        Test::And(vec![Test::regexp("kernel_cmdline: .*")?, run.get(KERNEL_CMDLINE)?]),
                    ]),
                ),
            ),
        )?;
        dispatcher.set(
            Self::event_key(9, "EV_IPL"),
            Test::field(
                "Event",
                Test::field(
                    "String",
                    Test::Or(vec![
                        Test::regexp(r"\(tftp,.*\).*")?,
                        Test::regexp(r"/boot/grub.*")?,
                        run.get(IPL9)?,
                    ]),
                ),
            ),
        )?;

        let event_test = IterateTest::new(Test::Dispatcher(dispatcher), true)
            .with_initial_test(run.initializer())
            .with_final_test(run.into());
        Ok(Test::field_unnamed("events", event_test.into()))
    }
}
