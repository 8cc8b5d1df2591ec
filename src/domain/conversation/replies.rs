//! Reply catalogue.
//!
//! Plain text only. Channel adapters add their own markup.

use chrono::NaiveDate;

use crate::domain::customer::{ComplaintDetail, ComplaintSummary, Customer, Invoice, UpdatableField};
use crate::domain::foundation::{ComplaintId, Dni};

/// Placeholder for any value a record does not carry.
pub const NOT_AVAILABLE: &str = "No disponible";

/// Where customers can browse every invoice.
pub const INVOICES_URL: &str = "https://frontdecsa.vercel.app/";

const MENU: &str = "Puedo asistirte con:\n- Reclamos\n- Actualizar datos\n- Consultas\n- Facturas";
const OR_CANCEL: &str = "O di cancelar para salir.";

pub fn welcome() -> String {
    format!(
        "¡Hola! Soy el asistente virtual de DECSA.\n\n¿Cómo puedo ayudarte hoy?\n{}",
        MENU
    )
}

pub fn conversation_reset() -> String {
    format!("Conversación reiniciada.\n\n¿En qué puedo ayudarte?\n{}", MENU)
}

pub fn cancelled() -> String {
    format!("Proceso detenido.\n\n¿En qué puedo ayudarte ahora?\n{}", MENU)
}

pub fn nothing_to_cancel() -> String {
    format!("No hay ningún proceso activo.\n\n¿Cómo puedo ayudarte hoy?\n{}", MENU)
}

pub fn not_understood() -> String {
    format!("No entendí bien tu mensaje.\n\n¿Cómo puedo ayudarte hoy?\n{}", MENU)
}

pub fn classifier_unavailable() -> String {
    "Ups, algo falló. ¿En qué te ayudo?".to_string()
}

pub fn validator_unavailable() -> String {
    "Ups, algo falló al validar el reclamo.".to_string()
}

pub fn claim_not_validated() -> String {
    "No se pudo validar el reclamo.".to_string()
}

pub fn claim_validation_technical_failure() -> String {
    "No pude validar tu reclamo debido a un problema técnico.".to_string()
}

pub fn apology() -> String {
    format!(
        "Uy, algo falló de nuestro lado.\n\nIntentemos de nuevo desde el principio.\n{}",
        MENU
    )
}

pub fn anything_else() -> String {
    format!("¿En qué más puedo ayudarte?\n\n{}", MENU)
}

pub fn ask_dni() -> String {
    format!("Para continuar, indícame tu DNI (solo números).\n{}", OR_CANCEL)
}

pub fn ask_field() -> String {
    format!(
        "¿Qué dato quieres actualizar?\ncalle | barrio | celular | correo\n\n{}",
        OR_CANCEL
    )
}

pub fn field_choice_invalid() -> String {
    format!(
        "Opción no reconocida.\n\nPor favor, elegí una de las siguientes: calle | barrio | celular | correo\n\n{}",
        OR_CANCEL
    )
}

pub fn field_selected(chosen: &str) -> String {
    format!(
        "¡Entendido! Quieres actualizar tu {}.\n\nPor favor, indícame tu DNI.\n{}",
        chosen, OR_CANCEL
    )
}

pub fn dni_invalid() -> String {
    format!("DNI no válido.\n\nPor favor, ingresa solo números.\n{}", OR_CANCEL)
}

pub fn dni_not_found() -> String {
    format!(
        "No encontré a nadie con ese DNI.\n\nPor favor, verifica el número e inténtalo de nuevo.\n{}",
        OR_CANCEL
    )
}

pub fn confirm_identity(nombre: &str) -> String {
    format!(
        "¿Eres {}?\n\nResponde sí o no para confirmar.\n{}",
        nombre, OR_CANCEL
    )
}

pub fn confirmation_invalid() -> String {
    format!("Por favor, responde solo sí o no para confirmar.\n\n{}", OR_CANCEL)
}

pub fn identity_rejected() -> String {
    "Entendido, el DNI no es correcto.\n\nDime otro cuando quieras o pregunta otra cosa.".to_string()
}

pub fn ask_description(nombre: &str) -> String {
    format!(
        "¡Gracias por confirmar, {}!\n\nCuéntame qué problema tienes para registrar tu reclamo.\n(Debe estar relacionado con cortes de luz, energía eléctrica o daños por el servicio)\n\n{}",
        nombre, OR_CANCEL
    )
}

pub fn description_too_short() -> String {
    format!(
        "Necesito más detalles.\n\nDescribe el problema con al menos 3 caracteres.\n(Relacionado con cortes de luz, energía eléctrica o daños por el servicio)\n\n{}",
        OR_CANCEL
    )
}

pub fn claim_rejected(reason: &str) -> String {
    format!(
        "No parece un reclamo válido.\n\n{}\n\nPor favor, describe un problema relacionado con cortes de luz, energía eléctrica o daños por el servicio.\n{}",
        reason, OR_CANCEL
    )
}

pub fn complaints_listed(nombre: &str, complaints: &[ComplaintSummary]) -> String {
    let lines: Vec<String> = complaints.iter().map(ComplaintSummary::line).collect();
    format!(
        "Gracias, {}.\n\nAquí están tus últimos {} reclamos:\n{}\n\nSi quieres detalles de uno, dime su ID.\n{}",
        nombre,
        complaints.len(),
        lines.join("\n"),
        OR_CANCEL
    )
}

pub fn no_complaints() -> String {
    "No tienes reclamos registrados.".to_string()
}

pub fn complaints_unavailable() -> String {
    "No pude obtener tus reclamos. Intenta de nuevo más tarde.".to_string()
}

pub fn complaint_id_invalid() -> String {
    format!("Por favor, dame un ID de reclamo (solo números).\n{}", OR_CANCEL)
}

pub fn complaint_not_found() -> String {
    format!("No encontré ese reclamo.\n\nIntenta con otro ID.\n{}", OR_CANCEL)
}

pub fn complaint_detail(detail: &ComplaintDetail) -> String {
    let complaint = &detail.complaint;
    let customer = &detail.customer;
    format!(
        "Detalles del reclamo ID {}:\n\n- Descripción: {}\n- Estado: {}\n- Fecha de reclamo: {}\n- Cliente: {} (DNI: {})\n- Dirección: {}",
        complaint.id,
        complaint.descripcion,
        complaint.estado,
        complaint.fecha.format("%d/%m/%Y %H:%M"),
        customer.display_name(),
        customer.dni,
        address(customer.calle.as_deref(), customer.barrio.as_deref()),
    )
}

pub fn current_field_value(field: UpdatableField, value: Option<&str>) -> String {
    format!(
        "Tu {} actual es:\n{}\n\nDime el nuevo valor para actualizarlo.\n{}",
        field.label(),
        value.unwrap_or(NOT_AVAILABLE),
        OR_CANCEL
    )
}

pub fn invoice(nombre: &str, dni: &Dni, invoice: &Invoice) -> String {
    let total = invoice
        .total
        .map(|t| format!("${:.2}", t))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let consumo = invoice
        .consumo_kwh
        .map(|c| format!("{} kWh", c))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let estado = invoice
        .estado
        .map(|e| e.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    format!(
        "Factura de {} (DNI: {})\n\n\
         Número de cuenta: {}\n\
         N° Comprobante: {}\n\
         Fecha emisión: {}\n\
         Estado: {}\n\
         Total: {}\n\
         Vencimiento: {}\n\
         Dirección: {}, {}\n\
         Medidor: {}\n\
         Período: {}\n\
         Consumo: {}\n\n\
         Para ver todas tus facturas, visita: {}",
        nombre,
        dni,
        or_na(invoice.codigo_suministro.as_deref()),
        or_na(invoice.numero_comprobante.as_deref()),
        date_or_na(invoice.fecha_emision),
        estado,
        total,
        date_or_na(invoice.vencimiento),
        or_na(invoice.calle.as_deref()),
        or_na(invoice.barrio.as_deref()),
        or_na(invoice.numero_medidor.as_deref()),
        or_na(invoice.periodo.as_deref()),
        consumo,
        INVOICES_URL,
    )
}

pub fn no_invoices() -> String {
    "No encontré facturas para tu DNI.\n\nVerifica e intenta de nuevo.".to_string()
}

pub fn invoices_unavailable() -> String {
    "No pude consultar tu factura ahora.\n\nIntenta de nuevo más tarde.".to_string()
}

pub fn complaint_registered(nombre: &str, id: ComplaintId, descripcion: &str) -> String {
    format!(
        "¡Listo, {}! Tu reclamo está registrado.\n\nID: {}\nEstado: Pendiente\nResumen: {}",
        nombre, id, descripcion
    )
}

pub fn complaint_not_registered() -> String {
    "Lo siento, no pude registrar tu reclamo.\n\n¿Intentamos de nuevo?".to_string()
}

pub fn update_applied(nombre: &str, customer: &Customer) -> String {
    format!(
        "¡Actualización exitosa, {}!\n\nDatos actualizados:\nNombre: {}\nCalle: {}\nBarrio: {}\nTeléfono: {}\nCorreo: {}",
        nombre,
        customer.display_name(),
        or_na(customer.field_value(UpdatableField::Calle)),
        or_na(customer.field_value(UpdatableField::Barrio)),
        or_na(customer.field_value(UpdatableField::Celular)),
        or_na(customer.field_value(UpdatableField::Email)),
    )
}

pub fn update_failed() -> String {
    "No pude actualizar eso ahora.\n\n¿Probamos otra vez?".to_string()
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn date_or_na(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn address(calle: Option<&str>, barrio: Option<&str>) -> String {
    let calle = calle.filter(|v| !v.trim().is_empty());
    let barrio = barrio.filter(|v| !v.trim().is_empty());
    match (calle, barrio) {
        (Some(c), Some(b)) => format!("calle {}, barrio {}", c, b),
        (Some(c), None) => c.to_string(),
        (None, Some(b)) => b.to_string(),
        (None, None) => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::InvoiceStatus;

    #[test]
    fn invoice_renders_missing_values_as_not_available() {
        let dni = Dni::parse("30111222").unwrap();
        let text = invoice("Pérez Juan", &dni, &Invoice::default());

        assert!(text.contains("Número de cuenta: No disponible"));
        assert!(text.contains("Total: No disponible"));
        assert!(text.contains(INVOICES_URL));
    }

    #[test]
    fn invoice_formats_amounts_and_dates() {
        let dni = Dni::parse("30111222").unwrap();
        let inv = Invoice {
            total: Some(1234.5),
            estado: Some(InvoiceStatus::Pagada),
            vencimiento: NaiveDate::from_ymd_opt(2024, 3, 9),
            consumo_kwh: Some(230.0),
            ..Invoice::default()
        };

        let text = invoice("Pérez Juan", &dni, &inv);

        assert!(text.contains("Total: $1234.50"));
        assert!(text.contains("Estado: Pagada"));
        assert!(text.contains("Vencimiento: 09/03/2024"));
        assert!(text.contains("Consumo: 230 kWh"));
    }

    #[test]
    fn address_uses_whatever_is_present() {
        assert_eq!(address(Some("Mitre 10"), Some("Centro")), "calle Mitre 10, barrio Centro");
        assert_eq!(address(None, Some("Centro")), "Centro");
        assert_eq!(address(Some(" "), None), NOT_AVAILABLE);
    }

    #[test]
    fn current_value_falls_back_to_not_available() {
        let text = current_field_value(UpdatableField::Email, None);
        assert!(text.starts_with("Tu email actual es:\nNo disponible"));
    }

    #[test]
    fn registered_complaint_mentions_pending_status() {
        let text = complaint_registered("Ana", ComplaintId::new(12), "sin luz");
        assert!(text.contains("ID: 12"));
        assert!(text.contains("Pendiente"));
    }
}
