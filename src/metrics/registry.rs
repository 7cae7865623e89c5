//! Static table of the NUT variables exported as metrics.
//!
//! The unit of each metric is implied by its name suffix. The table is built
//! at compile time and never changes; [`descriptor`] looks entries up through
//! an index created on first use.

use crate::metrics::data::MetricDescriptor;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Variable holding the beeper state, exported as an enumerated code.
pub const BEEPER_STATUS: &str = "ups.beeper.status";

/// Variable holding the battery charger state, exported as an enumerated code.
pub const CHARGER_STATUS: &str = "battery.charger.status";

const fn gauge(
    variable: &'static str,
    name: &'static str,
    help: &'static str,
) -> MetricDescriptor {
    MetricDescriptor {
        variable,
        name,
        help,
    }
}

#[rustfmt::skip]
static DESCRIPTORS: &[MetricDescriptor] = &[
    gauge("device.uptime", "ups_uptime_seconds", "Device uptime"),
    gauge("ups.temperature", "ups_temperature_celsius", "UPS temperature"),
    gauge("ups.load", "ups_load_percent", "Load on UPS"),
    gauge("ups.load.high", "ups_load_high_percent", "Load when UPS switches to overload condition"),
    gauge("ups.efficiency", "ups_efficiency", "Efficiency of the UPS (ratio of the output current on the input current)"),
    gauge("ups.power", "ups_power_voltamperes", "Current value of apparent power"),
    gauge("ups.power.nominal", "ups_power_nominal_voltamperes", "Nominal value of apparent power"),
    gauge("ups.realpower", "ups_realpower_watts", "Current value of real power"),
    gauge("ups.realpower.nominal", "ups_realpower_nominal_watts", "Nominal value of real power"),
    gauge("ups.beeper.status", "ups_beeper_status", "UPS beeper status (enabled = 0, disabled = 1, muted = 2)"),
    gauge("input.voltage", "input_voltage_volts", "Input voltage"),
    gauge("input.voltage.maximum", "input_voltage_maximum_volts", "Maximum incoming voltage seen"),
    gauge("input.voltage.minimum", "input_voltage_minimum_volts", "Minimum incoming voltage seen"),
    gauge("input.voltage.low.warning", "input_voltage_low_warning_volts", "Low warning threshold"),
    gauge("input.voltage.low.critical", "input_voltage_low_critical_volts", "Low critical threshold"),
    gauge("input.voltage.high.warning", "input_voltage_high_warning_volts", "High warning threshold"),
    gauge("input.voltage.high.critical", "input_voltage_high_critical_volts", "High critical threshold"),
    gauge("input.voltage.nominal", "input_voltage_nominal_volts", "Nominal input voltage"),
    gauge("input.transfer.delay", "input_transfer_delay_seconds", "Delay before transfer to mains"),
    gauge("input.transfer.low", "input_transfer_low_volts", "Low voltage transfer point"),
    gauge("input.transfer.high", "input_transfer_high_volts", "High voltage transfer point"),
    gauge("input.transfer.low.min", "input_transfer_low_min_volts", "smallest settable low voltage transfer point"),
    gauge("input.transfer.low.max", "input_transfer_low_max_volts", "greatest settable low voltage transfer point"),
    gauge("input.transfer.high.min", "input_transfer_high_min_volts", "smallest settable high voltage transfer point"),
    gauge("input.transfer.high.max", "input_transfer_high_max_volts", "greatest settable high voltage transfer point"),
    gauge("input.current", "input_current_amperes", "Input current"),
    gauge("input.current.nominal", "input_current_nominal_amperes", "Nominal input current"),
    gauge("input.current.low.warning", "input_current_low_warning_amperes", "Low warning threshold"),
    gauge("input.current.low.critical", "input_current_low_critical_amperes", "Low critical threshold"),
    gauge("input.current.high.warning", "input_current_high_warning_amperes", "High warning threshold"),
    gauge("input.current.high.critical", "input_current_high_critical_amperes", "High critical threshold"),
    gauge("input.frequency", "input_frequency_hertz", "Input line frequency"),
    gauge("input.frequency.nominal", "input_frequency_nominal_hertz", "Nominal input line frequency"),
    gauge("input.frequency.low", "input_frequency_low_hertz", "Input line frequency low"),
    gauge("input.frequency.high", "input_frequency_high_hertz", "Input line frequency high"),
    gauge("input.transfer.boost.low", "input_transfer_boost_low_hertz", "Low voltage boosting transfer point"),
    gauge("input.transfer.boost.high", "input_transfer_boost_high_hertz", "High voltage boosting transfer point"),
    gauge("input.transfer.trim.low", "input_transfer_trim_low_hertz", "Low voltage trimming transfer point"),
    gauge("input.transfer.trim.high", "input_transfer_trim_high_hertz", "High voltage trimming transfer point"),
    gauge("input.load", "input_load_percent", "Load on (ePDU) input"),
    gauge("input.realpower", "input_realpower_watts", "Current sum value of all (ePDU) phases real power"),
    gauge("input.power", "input_power_voltamperes", "Current sum value of all (ePDU) phases apparent power"),
    gauge("output.voltage", "output_voltage_volts", "Output voltage"),
    gauge("output.voltage.nominal", "output_voltage_nominal_volts", "Nominal output voltage"),
    gauge("output.frequency", "output_frequency_hertz", "Output frequency"),
    gauge("output.frequency.nominal", "output_frequency_nominal_hertz", "Nominal output frequency"),
    gauge("output.current", "output_current_amperes", "Output current"),
    gauge("output.current.nominal", "output_current_nominal_amperes", "Nominal output current"),
    gauge("battery.charge", "battery_charge_percent", "Battery charge"),
    gauge("battery.charge.low", "battery_charge_low_percent", "Remaining battery level when UPS switches to LB"),
    gauge("battery.charge.restart", "battery_charge_restart_percent", "Minimum battery level for UPS restart after power-off"),
    gauge("battery.charge.warning", "battery_charge_warning_percent", "Battery level when UPS switches to \"Warning\" state"),
    gauge("battery.charger.status", "battery_charger_status", "Status of the battery charger (charging = 0, discharging = 1, floating = 2, resting = 3)"),
    gauge("battery.voltage", "battery_voltage_volts", "Battery voltage"),
    gauge("battery.voltage.nominal", "battery_voltage_nominal_volts", "Nominal battery voltage"),
    gauge("battery.voltage.low", "battery_voltage_low_volts", "Minimum battery voltage, that triggers FSD status"),
    gauge("battery.voltage.high", "battery_voltage_high_volts", "Maximum battery voltage (i.e. battery.charge = 100)"),
    gauge("battery.capacity", "battery_capacity_amperehours", "Battery capacity"),
    gauge("battery.current", "battery_current_amperes", "Battery current"),
    gauge("battery.current.total", "battery_current_total_amperes", "Total battery current"),
    gauge("battery.temperature", "battery_temperature_celsius", "Battery temperature"),
    gauge("battery.runtime", "battery_runtime_seconds", "Battery runtime"),
    gauge("battery.runtime.low", "battery_runtime_low_seconds", "Remaining battery runtime when UPS switches to LB"),
    gauge("battery.runtime.restart", "battery_runtime_restart_seconds", "Minimum battery runtime for UPS restart after power-off"),
    gauge("battery.packs", "battery_packs", "Number of battery packs"),
    gauge("battery.packs.bad", "battery_packs_bad", "Number of bad battery packs"),
];

lazy_static! {
    static ref BY_VARIABLE: HashMap<&'static str, &'static MetricDescriptor> =
        DESCRIPTORS.iter().map(|d| (d.variable, d)).collect();
}

/// Every registered metric, in a stable order.
pub fn descriptors() -> &'static [MetricDescriptor] {
    DESCRIPTORS
}

/// The descriptor registered for `variable`, if any.
pub fn descriptor(variable: &str) -> Option<&'static MetricDescriptor> {
    BY_VARIABLE.get(variable).copied()
}
