use crate::strategy::{GuidForm, Strategy};

/// One place in the store that may reference an adapter GUID.
///
/// Descriptors are compiled-in data interpreted by the strategies; no
/// descriptor depends on another's outcome.
#[derive(Debug, Clone)]
pub struct LocationDescriptor {
    /// Human label, unique across the catalog (carries the root tag).
    pub id: String,
    /// Resolved base path, backslash-separated.
    pub path: String,
    pub strategy: Strategy,
}

/// The two parallel configuration-set roots. Every per-set location gets
/// one catalog entry under each; the strategies never special-case roots.
const CONFIG_ROOTS: &[(&str, &str)] = &[
    ("ccs", r"SYSTEM\CurrentControlSet"),
    ("cs001", r"SYSTEM\ControlSet001"),
];

const LINKAGE_PROPERTIES: &[&str] = &["Bind", "Export", "Route"];

/// Services whose Linkage node holds adapter references in decorated form.
const LINKAGE_SERVICES: &[&str] = &[
    "Tcpip",
    "Tcpip6",
    "NetBT",
    "Netbios",
    "LanmanServer",
    "LanmanWorkstation",
    "RemoteAccess",
    "Wanarp",
];

const NET_CLASS: &str = "{4D36E972-E325-11CE-BFC1-08002BE10318}";

fn push(
    out: &mut Vec<LocationDescriptor>,
    tag: &str,
    root: &str,
    id: &str,
    rel: &str,
    strategy: Strategy,
) {
    out.push(LocationDescriptor {
        id: format!("{id} [{tag}]"),
        path: format!(r"{root}\{rel}"),
        strategy,
    });
}

/// Build the full location catalog, in display order. The list is static,
/// manually curated domain data; the engine discovers nothing on its own.
pub fn catalog() -> Vec<LocationDescriptor> {
    let mut out = Vec::new();
    for &(tag, root) in CONFIG_ROOTS {
        let braced = Strategy::ExactChildPath { form: GuidForm::Braced };

        push(
            &mut out,
            tag,
            root,
            "tcpip-interface",
            r"Services\Tcpip\Parameters\Interfaces",
            braced,
        );
        push(
            &mut out,
            tag,
            root,
            "tcpip6-interface",
            r"Services\Tcpip6\Parameters\Interfaces",
            braced,
        );
        push(
            &mut out,
            tag,
            root,
            "dns-registered-adapter",
            r"Services\Tcpip\Parameters\DNSRegisteredAdapters",
            braced,
        );
        push(
            &mut out,
            tag,
            root,
            "netbt-interface",
            r"Services\NetBT\Parameters\Interfaces",
            Strategy::ExactChildPath { form: GuidForm::Prefixed("Tcpip_") },
        );
        push(
            &mut out,
            tag,
            root,
            "netbt6-interface",
            r"Services\NetBT\Parameters\Interfaces",
            Strategy::ExactChildPath { form: GuidForm::Prefixed("Tcpip6_") },
        );
        push(
            &mut out,
            tag,
            root,
            "isatap-interface",
            r"Services\iphlpsvc\Parameters\Isatap",
            braced,
        );
        push(
            &mut out,
            tag,
            root,
            "psched-adapter",
            r"Services\Psched\Parameters\Adapters",
            braced,
        );
        push(
            &mut out,
            tag,
            root,
            "wfplwf-adapter",
            r"Services\WfpLwf\Parameters\NdisAdapters",
            braced,
        );
        push(
            &mut out,
            tag,
            root,
            "network-connection",
            &format!(r"Control\Network\{NET_CLASS}"),
            braced,
        );
        push(
            &mut out,
            tag,
            root,
            "networksetup2-interface",
            r"Control\NetworkSetup2\Interfaces",
            braced,
        );
        push(
            &mut out,
            tag,
            root,
            "nsi-interface",
            r"Control\Nsi\Interfaces",
            Strategy::ExactChildPath { form: GuidForm::Bare },
        );

        for service in LINKAGE_SERVICES {
            push(
                &mut out,
                tag,
                root,
                &format!("{}-linkage", service.to_ascii_lowercase()),
                &format!(r"Services\{service}\Linkage"),
                Strategy::PropertyScan { properties: LINKAGE_PROPERTIES },
            );
        }

        push(
            &mut out,
            tag,
            root,
            "net-class-adapter",
            &format!(r"Control\Class\{NET_CLASS}"),
            Strategy::NodeNameOrPropertyMatch { property: "NetCfgInstanceId" },
        );

        push(
            &mut out,
            tag,
            root,
            "dhcp-parameters",
            r"Services\Dhcp\Parameters",
            Strategy::ListFilter,
        );
        push(
            &mut out,
            tag,
            root,
            "dnscache-parameters",
            r"Services\Dnscache\Parameters",
            Strategy::ListFilter,
        );
    }

    // Software-side adapter index; one root only.
    out.push(LocationDescriptor {
        id: "network-cards".to_string(),
        path: r"SOFTWARE\Microsoft\Windows NT\CurrentVersion\NetworkCards".to_string(),
        strategy: Strategy::NodeNameOrPropertyMatch { property: "ServiceName" },
    });

    out
}
