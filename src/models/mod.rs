// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//
// Liste des modules:
//   - health : Health check API
//   - trade : Journal des trades (actions + options, append-only)
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// Points d'attention:
//   - La table trades utilise SeaORM (pas de SQL brut)
//   - Les positions ne sont PAS stockées: elles sont recalculées à chaque
//     lecture en rejouant le journal complet (voir services::engine)
//
// ============================================================================

pub mod health;
pub mod trade;
pub mod dto;
