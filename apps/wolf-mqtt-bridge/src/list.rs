use std::fmt::Write;
use wolf_bridge::Installation;

/// `list` 子命令的输出：安装信息，然后逐个参数。
pub fn render(installation: &Installation) -> String {
    let mut out = String::new();
    let target = &installation.target;
    let _ = writeln!(out, "ID: {}", target.system_id);
    let _ = writeln!(out, "GatewayID: {}", target.gateway_id);
    let _ = writeln!(out, "Gateway Software Version: {}", target.software_version);
    let _ = writeln!(out, "Name: {}", target.name);

    for descriptor in installation.catalog.descriptors() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} / {}", descriptor.menu, descriptor.tab);
        let _ = writeln!(
            out,
            "  ValueId: {}  ParameterId: {}  Name: {}  Group: {}  Unit: {}{}",
            descriptor.value_id,
            descriptor.parameter_id,
            descriptor.name,
            descriptor.group,
            descriptor.unit.as_deref().unwrap_or("-"),
            if descriptor.read_only { "  (read-only)" } else { "" }
        );
        for item in &descriptor.items {
            let _ = writeln!(out, "    {} -> {}", item.value, item.display_text);
        }
    }
    out
}
