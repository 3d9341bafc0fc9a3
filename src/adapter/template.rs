use polypdf_types::PaginationInfo;

/// Substitutes pagination placeholders in a render template.
pub fn fill(template: &str, info: &PaginationInfo) -> String {
    template
        .replace("{pageNumber}", &info.page_number.to_string())
        .replace("{totalPages}", &info.total_pages.to_string())
        .replace("{subPageNumber}", &info.sub_page_number.to_string())
        .replace("{subPageTotalPages}", &info.sub_page_total_pages.to_string())
}
