//! Payload keys read by the adapters.

/// FAVOR annotation keys.
pub mod favor {
    // Identifier
    pub const RSID: &str = "rsid";
    pub const CHROMOSOME: &str = "chromosome";
    pub const POSITION: &str = "position";
    pub const VARIANT_VCF: &str = "variant_vcf";

    // Gene / consequence
    pub const GENE: &str = "genecode_comprehensive_info";
    pub const EXONIC_CATEGORY: &str = "genecode_comprehensive_exonic_category";
    pub const PROTEIN_VARIANT: &str = "protein_variant";
    pub const HGVSC: &str = "hgvsc";
    pub const HGVSP: &str = "hgvsp";

    // Pathogenicity predictors
    pub const CADD_PHRED: &str = "cadd_phred";
    pub const CADD_RAW: &str = "cadd_rawscore";
    pub const AM_PATHOGENICITY: &str = "am_pathogenicity";
    pub const AM_CLASS: &str = "am_class";
    pub const SIFT_SCORE: &str = "sift_score";
    pub const SIFT_CATEGORY: &str = "sift_cat";
    pub const POLYPHEN_HDIV: &str = "polyphen2_hdiv_score";
    pub const POLYPHEN_HVAR: &str = "polyphen2_hvar_score";
    pub const POLYPHEN_CATEGORY: &str = "polyphen_cat";
    pub const MUTATION_TASTER_SCORE: &str = "mutation_taster_score";
    pub const MUTATION_TASTER_PRED: &str = "mutation_taster_pred";

    // Population frequencies (gnomAD)
    pub const AF_TOTAL: &str = "af_total";
    pub const AF_AFR: &str = "af_afr";
    pub const AF_AMR: &str = "af_amr";
    pub const AF_EAS: &str = "af_eas";
    pub const AF_NFE: &str = "af_nfe";
    pub const AF_FIN: &str = "af_fin";
    pub const AF_SAS: &str = "af_sas";
    pub const AF_ASJ: &str = "af_asj";
    pub const AF_AMI: &str = "af_ami";
    pub const AF_OTH: &str = "af_oth";

    // ClinVar
    pub const CLNSIG: &str = "clnsig";
    pub const CLNDN: &str = "clndn";
    pub const CLNREVSTAT: &str = "clnrevstat";

    // Conservation
    pub const GERP_RS: &str = "gerp_rs";
    pub const GERP_S: &str = "gerp_s";
    pub const GERP_N: &str = "gerp_n";
    pub const PRIPHYLOP: &str = "priphylop";
    pub const MAMPHYLOP: &str = "mamphylop";
    pub const VERPHYLOP: &str = "verphylop";

    // Epigenetic and regulatory tracks
    pub const H3K4ME3: &str = "encodeh3k4me3_sum";
    pub const H3K27AC: &str = "encodeh3k27ac_sum";
    pub const H3K27ME3: &str = "encodeh3k27me3_sum";
    pub const REMAP_TF: &str = "remap_overlap_tf";
    pub const REMAP_CL: &str = "remap_overlap_cl";

    /// Every key extracted from a FAVOR record.
    pub const ALL: &[&str] = &[
        RSID, CHROMOSOME, POSITION, VARIANT_VCF,
        GENE, EXONIC_CATEGORY, PROTEIN_VARIANT, HGVSC, HGVSP,
        CADD_PHRED, CADD_RAW, AM_PATHOGENICITY, AM_CLASS,
        SIFT_SCORE, SIFT_CATEGORY,
        POLYPHEN_HDIV, POLYPHEN_HVAR, POLYPHEN_CATEGORY,
        MUTATION_TASTER_SCORE, MUTATION_TASTER_PRED,
        AF_TOTAL, AF_AFR, AF_AMR, AF_EAS, AF_NFE, AF_FIN, AF_SAS, AF_ASJ, AF_AMI, AF_OTH,
        CLNSIG, CLNDN, CLNREVSTAT,
        GERP_RS, GERP_S, GERP_N, PRIPHYLOP, MAMPHYLOP, VERPHYLOP,
        H3K4ME3, H3K27AC, H3K27ME3, REMAP_TF, REMAP_CL,
    ];
}

/// GTEx v2 keys.
pub mod gtex {
    pub const EQTL_RESULTS: &str = "eqtl_results";
    pub const RSID: &str = "rsid";
    pub const VARIANT_ID: &str = "variantId";
    pub const PAGING: &str = "paging";

    pub const SNP_ID: &str = "snpId";
    pub const GENE_SYMBOL: &str = "geneSymbol";
    pub const TISSUE: &str = "tissueSiteDetailId";
    pub const NES: &str = "nes";
    pub const P_VALUE: &str = "pValue";
    pub const GENCODE_ID: &str = "gencodeId";
}
