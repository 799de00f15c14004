use std::sync::Arc;

use chrono::Utc;

use crate::models::HealthTip;

const TIPS: [(&str, &str, &str, &str); 6] = [
    (
        "tip-1",
        "Hidratación Diaria",
        "Bebe al menos 8 vasos de agua al día para mantener tu cuerpo hidratado y ayudar a tu organismo a funcionar correctamente.",
        "Nutrición",
    ),
    (
        "tip-2",
        "Ejercicio Regular",
        "Realiza al menos 30 minutos de actividad física moderada 5 días a la semana para mantener un corazón saludable.",
        "Ejercicio",
    ),
    (
        "tip-3",
        "Descanso Adecuado",
        "Duerme entre 7-9 horas cada noche para permitir que tu cuerpo se recupere y tu mente se regenere.",
        "Descanso",
    ),
    (
        "tip-4",
        "Alimentación Balanceada",
        "Incluye frutas, verduras, proteínas magras y granos enteros en tu dieta diaria para obtener todos los nutrientes necesarios.",
        "Nutrición",
    ),
    (
        "tip-5",
        "Chequeos Médicos",
        "Realiza chequeos médicos regulares para detectar problemas de salud a tiempo y mantener un historial médico actualizado.",
        "Prevención",
    ),
    (
        "tip-6",
        "Manejo del Estrés",
        "Practica técnicas de relajación como meditación, yoga o respiración profunda para reducir el estrés diario.",
        "Bienestar Mental",
    ),
];

/// Serves the fixed health tip table built at startup.
#[derive(Debug, Clone)]
pub struct HealthTipService {
    tips: Arc<[HealthTip]>,
}

impl HealthTipService {
    pub fn new() -> Self {
        let created_at = Utc::now();
        let tips: Vec<HealthTip> = TIPS
            .iter()
            .map(|&(id, title, content, category)| HealthTip {
                id: id.to_owned(),
                title: title.to_owned(),
                content: content.to_owned(),
                category: category.to_owned(),
                image_url: None,
                is_active: true,
                created_at,
            })
            .collect();
        Self { tips: tips.into() }
    }

    pub fn list(&self) -> &[HealthTip] {
        &self.tips
    }
}

impl Default for HealthTipService {
    fn default() -> Self {
        Self::new()
    }
}
