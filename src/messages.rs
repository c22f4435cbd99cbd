//! User-facing Spanish strings.

pub const WELCOME_TITLE: &str = "¡Bienvenido/a!";
pub const WELCOME_BODY: &str = "Completá el formulario con tus datos e intereses y te \
                                recomendaremos las escuelas que mejor se adapten a vos.";

pub const LOADING: &str = "Buscando las mejores escuelas para vos...";

/// The only error text a user ever sees.
pub const SEARCH_FAILED: &str = "Lo sentimos, no pudimos obtener las recomendaciones. \
                                 Por favor, revisa tus datos e intenta de nuevo.";

pub const RESULTS_HEADING: &str = "Aquí están tus recomendaciones personalizadas:";
pub const RESULTS_DISCLAIMER: &str = "*Por favor, ten en cuenta: Las escuelas listadas son \
                                      cargadas manualmente y pueden faltar algunas.";

pub const EMPTY_TITLE: &str = "No se encontraron escuelas";
pub const EMPTY_BODY: &str = "No pudimos encontrar ninguna escuela que coincida con todos tus \
                              criterios. Por favor, intenta ajustar tus preferencias.";

pub const RESET_ACTION: &str = "Iniciar Nueva Búsqueda";

pub const SPECIALTIES_LABEL: &str = "Especialidades";
pub const REASON_LABEL: &str = "Por qué te la recomendamos";
